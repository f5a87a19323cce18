//! Error types for the zebra solver.

use crate::zebra::association::{Association, Relation};
use crate::zebra::attribute::AttributeId;
use thiserror::Error;

/// Result type for zebra solver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, loading or propagating a puzzle.
#[derive(Debug, Error)]
pub enum Error {
    /// An attribute was paired with itself.
    #[error("attribute {0} cannot be associated with itself")]
    InvalidPair(AttributeId),

    /// An assertion conflicts with an already determined state.
    /// The clues are inconsistent, or a deduction was wrong.
    #[error("contradiction: {a_name} and {b_name} are {existing}, cannot become {requested}")]
    Contradiction {
        /// First attribute of the conflicting pair.
        a: AttributeId,
        /// Second attribute of the conflicting pair.
        b: AttributeId,
        /// Name of `a`.
        a_name: String,
        /// Name of `b`.
        b_name: String,
        /// State the pair already holds.
        existing: Association,
        /// Value that could not be recorded.
        requested: Relation,
    },

    /// No attribute carries the given name.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// An attribute id outside `[0, total)`.
    #[error("attribute id {id} is out of range (puzzle has {total} attributes)")]
    OutOfRange {
        /// The offending id.
        id: AttributeId,
        /// Number of attributes in the puzzle.
        total: usize,
    },

    /// The definition has no categories or no attributes.
    #[error("a puzzle needs at least one category with at least one attribute")]
    EmptyPuzzle,

    /// Every category must hold the same number of attributes.
    #[error("category '{category}' has {actual} attributes, expected {expected}")]
    UnevenCategory {
        /// Name of the offending category.
        category: String,
        /// Size of the first category.
        expected: usize,
        /// Size of this one.
        actual: usize,
    },

    /// Attribute names are unique across the whole puzzle, ignoring case.
    #[error("attribute '{0}' is defined more than once")]
    DuplicateAttribute(String),

    /// Malformed puzzle file.
    #[error("line {line}: {message}")]
    Parse {
        /// Line number, starting at 1.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Reading a puzzle file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that mean the puzzle itself is inconsistent.
    #[must_use]
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::Contradiction { .. })
    }
}
