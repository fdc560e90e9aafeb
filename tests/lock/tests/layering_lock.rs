//! Crate layering: the kernel knows nothing above it, and the search crate
//! never touches the filesystem or the harness.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            rust_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

/// `(file, line, text)` for every non-comment line containing a pattern.
fn scan(crate_src: &str, forbidden: &[&str]) -> Vec<(String, usize, String)> {
    let mut files = Vec::new();
    rust_files(&workspace_root().join(crate_src), &mut files);
    assert!(!files.is_empty(), "no sources under {crate_src}");

    let mut hits = Vec::new();
    for path in files {
        let content = fs::read_to_string(&path).unwrap();
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if forbidden.iter().any(|p| trimmed.contains(p)) {
                hits.push((path.display().to_string(), i + 1, line.to_string()));
            }
        }
    }
    hits
}

fn report(hits: &[(String, usize, String)]) -> String {
    let mut msg = String::new();
    for (file, line, text) in hits {
        let _ = writeln!(msg, "  {file}:{line}: {}", text.trim());
    }
    msg
}

#[test]
fn kernel_depends_on_nothing_above_it() {
    let hits = scan(
        "kernel/src",
        &["chakra_search", "chakra_harness", "log::", "rand::"],
    );
    assert!(hits.is_empty(), "kernel reaches upward:\n{}", report(&hits));
}

#[test]
fn search_is_pure() {
    let hits = scan("search/src", &["chakra_harness", "std::fs", "std::env"]);
    assert!(hits.is_empty(), "search has side effects:\n{}", report(&hits));
}

#[test]
fn proof_imports_nothing_from_grid_or_cycle() {
    let hits = scan("kernel/src/proof", &["crate::grid", "crate::cycle"]);
    assert!(hits.is_empty(), "proof reaches into the model:\n{}", report(&hits));
}
