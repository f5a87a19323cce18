#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for `.zebra` puzzle files.
//!
//! The format is line based, in the spirit of DIMACS:
//! - Lines starting with `c` are comments; blank lines are skipped.
//! - A line holding only `%` ends the data; anything after it is ignored.
//! - `category <name> <attribute> <attribute> ...` defines a category.
//! - `link <attribute> <attribute>` states that two attributes belong to the
//!   same entity.
//! - `exclude <attribute> <attribute>` states that they do not.
//!
//! Names are single whitespace-free tokens, matched case-insensitively.
//! Clues are kept as names here and resolved when the puzzle is turned into
//! an engine, so categories and clues may appear in any order.
//!
//! ```text
//! c Three houses
//! category Color red blue green
//! category Pet cat dog fish
//! link red cat
//! exclude blue fish
//! ```

use crate::zebra::association::Relation;
use crate::zebra::engine::{EngineConfig, PropagationEngine};
use crate::zebra::error::{Error, Result};
use crate::zebra::store::AssociationStore;
use itertools::Itertools;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::path::Path;

/// A clue as written in a puzzle file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clue {
    /// First attribute name.
    pub a: String,
    /// Second attribute name.
    pub b: String,
    /// Whether the two are linked or excluded.
    pub relation: Relation,
}

impl Clue {
    /// A clue between two named attributes.
    pub fn new(a: impl Into<String>, b: impl Into<String>, relation: Relation) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            relation,
        }
    }
}

/// A puzzle definition together with its clues.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Puzzle {
    /// Category names with their attribute names, in file order.
    pub categories: Vec<(String, Vec<String>)>,
    /// Clues in file order.
    pub clues: Vec<Clue>,
}

impl Puzzle {
    /// A fresh store for this puzzle's categories, without clues.
    ///
    /// # Errors
    ///
    /// If the categories do not form a valid catalog.
    pub fn store(&self) -> Result<AssociationStore> {
        AssociationStore::from_categories(self.categories.iter().cloned())
    }

    /// Builds an engine and records every clue in order.
    ///
    /// # Errors
    ///
    /// - Catalog errors, see [`crate::zebra::attribute::Catalog::new`].
    /// - `UnknownAttribute` if a clue names an undefined attribute.
    /// - `InvalidPair` or `Contradiction` for clues that cannot hold.
    pub fn into_engine(self, config: EngineConfig) -> Result<PropagationEngine> {
        let mut engine = PropagationEngine::with_config(self.store()?, config);
        for clue in &self.clues {
            engine.assert_names(&clue.a, &clue.b, clue.relation)?;
        }
        Ok(engine)
    }
}

impl Display for Puzzle {
    /// Writes the puzzle back in the file format.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, attributes) in &self.categories {
            writeln!(f, "category {name} {}", attributes.iter().join(" "))?;
        }
        for clue in &self.clues {
            let keyword = match clue.relation {
                Relation::Linked => "link",
                Relation::Excluded => "exclude",
            };
            writeln!(f, "{keyword} {} {}", clue.a, clue.b)?;
        }
        Ok(())
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

/// Parses puzzle data from a `BufRead` source.
///
/// # Errors
///
/// - `Io` if reading fails.
/// - `Parse` for an unknown keyword, a category without attributes, or a
///   clue that does not name exactly two attributes. Line numbers start at 1.
pub fn parse_puzzle<R: BufRead>(reader: R) -> Result<Puzzle> {
    let mut puzzle = Puzzle::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("%") => break,
            None | Some("c") => {}
            Some("category") => {
                let name = parts
                    .next()
                    .ok_or_else(|| parse_error(number, "category needs a name"))?;
                let attributes = parts.map(str::to_string).collect_vec();
                if attributes.is_empty() {
                    return Err(parse_error(
                        number,
                        format!("category '{name}' has no attributes"),
                    ));
                }
                puzzle.categories.push((name.to_string(), attributes));
            }
            Some(keyword @ ("link" | "exclude")) => {
                let names = parts.collect_vec();
                let [a, b] = names.as_slice() else {
                    return Err(parse_error(
                        number,
                        format!("'{keyword}' takes two attributes, got {}", names.len()),
                    ));
                };
                let relation = Relation::from(keyword == "link");
                puzzle.clues.push(Clue::new(*a, *b, relation));
            }
            Some(other) => {
                return Err(parse_error(number, format!("unknown keyword '{other}'")));
            }
        }
    }

    Ok(puzzle)
}

/// Parses a puzzle file.
///
/// # Errors
///
/// `Io` if the file cannot be opened, otherwise as [`parse_puzzle`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Puzzle> {
    let file = std::fs::File::open(path)?;
    parse_puzzle(io::BufReader::new(file))
}
