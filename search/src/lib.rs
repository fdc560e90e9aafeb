//! Chakra Search: Warnsdorff-style Hamiltonian cycle search with
//! deduplication and constraint verification.
//!
//! This crate depends only on `chakra_kernel`; it does NOT depend on
//! `chakra_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! chakra_kernel  ←  chakra_search  ←  chakra_harness
//! (grid, cycle)     (search, dedup,    (config, output,
//!                    verify)           run loop, CLI)
//! ```
//!
//! # Key types
//!
//! - [`search::find_cycle`]: one greedy-with-backtracking attempt
//! - [`frame::DecisionFrame`]: an explicit backtracking stack entry
//! - [`prune::Pruner`]: feasibility checks that cut hopeless branches early
//! - [`tie_break::TieBreaker`]: trait ordering equal-degree candidates
//! - [`dedup::SeenSet`]: fingerprints of cycles already processed
//! - [`verify::ConstraintVerifier`]: run-length and adjacency checks
//! - [`policy::SearchPolicyV1`]: budget, tie-break and dedup configuration

#![forbid(unsafe_code)]

pub mod dedup;
pub mod error;
pub mod frame;
pub mod policy;
pub mod prune;
pub mod search;
pub mod tie_break;
pub mod verify;
