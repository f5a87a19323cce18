#![deny(missing_docs)]
//! This crate provides a constraint-propagation engine for logic grid puzzles of the
//! "Zebra Puzzle" family.

/// The `zebra` module implements the association store, the deduction rules and the
/// fixed-point engine that drives them, plus puzzle loading, generation and rendering.
pub mod zebra;
