#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Constraint propagation for logic grid puzzles.
//!
//! The [`store::AssociationStore`] holds what is known about every pair of
//! attributes; the [`engine::PropagationEngine`] derives new facts from it
//! with the rules in [`rules`] until nothing changes.

pub mod association;
pub mod attribute;
pub mod engine;
pub mod error;
pub mod generator;
pub mod grid;
pub mod progress;
pub mod puzzle;
pub mod rules;
pub mod store;

pub use association::{Association, Relation};
pub use attribute::{Attribute, AttributeId, Catalog};
pub use engine::{EngineConfig, PropagationEngine, PropagationStats};
pub use error::{Error, Result};
pub use store::AssociationStore;
