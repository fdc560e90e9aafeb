//! Proof module: canonical hashing and domain separation.
//!
//! `proof` imports nothing from `grid` or `cycle`. `grid` depends on it
//! for the topology identity digest.

pub mod hash;
pub mod hash_domain;
