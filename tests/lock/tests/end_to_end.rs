//! End-to-end: grid text in, solution files out, symbols decode back to the
//! accepted cycle's values.

use chakra_harness::config::RunConfig;
use chakra_harness::output::{read_solution_file, SolutionWriter};
use chakra_harness::runner::{AttemptOutcome, Orchestrator, StopSignal};
use chakra_harness::symbols::SymbolTable;
use chakra_kernel::grid::matrix::GridMatrix;
use chakra_kernel::grid::topology::Topology;
use lock_tests::grid_fixtures::{friendly_scheme, FRIENDLY_4X4};

fn grid_text() -> String {
    FRIENDLY_4X4
        .chunks(4)
        .map(|row| {
            row.iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[test]
fn accepted_cycle_round_trips_through_solution_file() {
    let matrix = GridMatrix::parse_square(&grid_text()).unwrap();
    let topology = Topology::build(&matrix, &friendly_scheme()).unwrap();
    let devanagari = SymbolTable::devanagari();
    let kannada = SymbolTable::kannada();
    devanagari.check_covers(&topology).unwrap();
    kannada.check_covers(&topology).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        output_dir: dir.path().join("out"),
        max_accepted: Some(1),
        labels: friendly_scheme(),
        ..RunConfig::default()
    };
    let sink = SolutionWriter::new(&config.output_dir, "sample", devanagari.clone(), kannada.clone());
    let mut o = Orchestrator::new(topology.clone(), &config, Box::new(sink), StopSignal::new())
        .unwrap();

    let outcome = o.run_once();
    let AttemptOutcome::Accepted {
        fingerprint,
        location: Some(location),
        ..
    } = outcome
    else {
        panic!("expected acceptance, got {outcome:?}");
    };
    assert_eq!(
        location.file_name().unwrap().to_string_lossy(),
        format!("sample-{}.txt", fingerprint.short_hex(12))
    );

    let record = read_solution_file(&location).unwrap();
    let decoded = devanagari.decode(&record.script_a_line).unwrap();
    assert_eq!(decoded.len(), topology.len() + 1);
    assert_eq!(decoded.first(), decoded.last());

    // The trace gives the accepted cycle; its values must match the symbols.
    let traced_values: Vec<u32> = record.path.iter().map(|&(_, _, v)| v).collect();
    assert_eq!(decoded, traced_values);
    for &(row, col, value) in &record.path {
        let id = topology.id_at(row, col).unwrap();
        assert_eq!(topology.vertex(id).value(), value);
    }
    assert_eq!(kannada.decode(&record.script_b_line).unwrap(), decoded);
    assert_eq!(record.script_b_name, "Kannada");

    let sidecar_path = location.with_extension("json");
    let sidecar: serde_json::Value =
        serde_json::from_slice(&std::fs::read(sidecar_path).unwrap()).unwrap();
    assert_eq!(sidecar["fingerprint"], fingerprint.as_str());
    let sidecar_values: Vec<u32> = sidecar["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| u32::try_from(v.as_u64().unwrap()).unwrap())
        .collect();
    assert_eq!(sidecar_values, decoded);
}

#[test]
fn run_writes_one_file_per_accepted_cycle() {
    let matrix = GridMatrix::parse_square(&grid_text()).unwrap();
    let topology = Topology::build(&matrix, &friendly_scheme()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        output_dir: dir.path().to_path_buf(),
        prefix: "chakra".into(),
        max_accepted: Some(3),
        labels: friendly_scheme(),
        ..RunConfig::default()
    };
    let sink = SolutionWriter::new(
        &config.output_dir,
        config.prefix.as_str(),
        SymbolTable::devanagari(),
        SymbolTable::kannada(),
    );
    let mut o = Orchestrator::new(topology, &config, Box::new(sink), StopSignal::new()).unwrap();
    let stats = o.run();
    assert_eq!(stats.accepted, 3);

    let mut texts = 0;
    let mut sidecars = 0;
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().to_string();
        assert!(name.starts_with("chakra-"), "unexpected file {name}");
        if name.ends_with(".txt") {
            texts += 1;
        } else if name.ends_with(".json") {
            sidecars += 1;
        }
    }
    assert_eq!((texts, sidecars), (3, 3));
}
