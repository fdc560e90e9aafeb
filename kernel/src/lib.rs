//! Chakra Kernel: the immutable grid model underneath the cycle search.
//!
//! # API Surface
//!
//! - [`grid::matrix::GridMatrix`] -- parse and validate a rectangular value matrix
//! - [`grid::topology::Topology::build`] -- build the 8-connected toroidal adjacency
//! - [`cycle::Cycle`] -- a closed vertex sequence covering every vertex once
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `proof` ← `grid` ← `cycle`
//!
//! One-way only. No cycles. `proof` depends on nothing internal; `grid`
//! uses it for the grid identity digest; `cycle` depends on `grid`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cycle;
pub mod grid;
pub mod proof;
