//! Chakra harness: run orchestration, symbol rendering and solution output.
//!
//! The harness drives the search crate in a loop
//! (`find_cycle` → `cycle_fingerprint` → `ConstraintVerifier::verify`)
//! and hands accepted cycles to a [`output::CycleSink`]. It does not
//! implement search or verification logic itself.
//!
//! Dependency direction: `chakra_kernel` ← `chakra_search` ← `chakra_harness`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod annotate;
pub mod config;
pub mod output;
pub mod runner;
pub mod symbols;
