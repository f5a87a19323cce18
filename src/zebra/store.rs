#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The association store: the complete state of a logic grid puzzle.
//!
//! The store keeps one [`Association`] per unordered pair of attributes, so
//! `query(a, b) == query(b, a)` holds by construction. Pairs within a single
//! category are excluded when the store is built and never change afterwards.
//!
//! All writes go through [`AssociationStore::assert`], which enforces two
//! rules at the boundary:
//! - a determined pair can only be re-asserted with the same value;
//! - linking `a` with `b` excludes `a` from every other attribute of `b`'s
//!   category and `b` from every other attribute of `a`'s category, as part
//!   of the same write.

use crate::zebra::association::{Association, Relation};
use crate::zebra::attribute::{AttributeId, Catalog};
use crate::zebra::error::{Error, Result};
use crate::zebra::progress::Progress;
use smallvec::SmallVec;
use tracing::trace;

/// Symmetric pairwise association matrix over all attributes of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationStore {
    catalog: Catalog,
    total: usize,
    cells: Vec<Association>,
    progress: Progress,
}

impl AssociationStore {
    /// Creates a store where every cross-category pair is unknown.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let total = catalog.total();
        let mut store = Self {
            total,
            cells: vec![Association::Unknown; total * total.saturating_sub(1) / 2],
            progress: Progress::empty(catalog.num_categories(), catalog.per_category()),
            catalog,
        };

        for category in 0..store.catalog.num_categories() {
            let range = store.catalog.category_range(category);
            for a in range.clone() {
                for b in (a + 1)..range.end {
                    let slot = store.slot(a, b);
                    store.cells[slot] = Association::Excluded;
                }
            }
        }

        store
    }

    /// Builds the catalog from `(category, attributes)` pairs and wraps it in a fresh store.
    ///
    /// # Errors
    ///
    /// See [`Catalog::new`].
    pub fn from_categories<I, C, A, S>(definition: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, A)>,
        C: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Catalog::new(definition).map(Self::new)
    }

    /// The attributes this store is defined over.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Index of the unordered pair `{a, b}` in the upper triangle, `a != b`.
    const fn slot(&self, a: AttributeId, b: AttributeId) -> usize {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        i * self.total - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Unchecked lookup for callers that already hold two distinct, valid ids.
    pub(crate) fn get(&self, a: AttributeId, b: AttributeId) -> Association {
        debug_assert_ne!(a, b, "self-pairs have no association");
        self.cells[self.slot(a, b)]
    }

    fn set(&mut self, a: AttributeId, b: AttributeId, relation: Relation) {
        let slot = self.slot(a, b);
        if self.cells[slot].is_unknown() {
            match relation {
                Relation::Linked => self.progress.linked += 1,
                Relation::Excluded => self.progress.excluded += 1,
            }
        }
        self.cells[slot] = relation.into();
    }

    fn check_pair(&self, a: AttributeId, b: AttributeId) -> Result<()> {
        self.catalog.check(a)?;
        self.catalog.check(b)?;
        if a == b {
            return Err(Error::InvalidPair(a));
        }
        Ok(())
    }

    fn contradiction(
        &self,
        a: AttributeId,
        b: AttributeId,
        existing: Association,
        requested: Relation,
    ) -> Error {
        Error::Contradiction {
            a,
            b,
            a_name: self.catalog.name(a).to_string(),
            b_name: self.catalog.name(b).to_string(),
            existing,
            requested,
        }
    }

    /// Symmetric lookup of the association between `a` and `b`.
    ///
    /// # Errors
    ///
    /// - `InvalidPair` if `a == b`.
    /// - `OutOfRange` if either id is not an attribute of this puzzle.
    pub fn query(&self, a: AttributeId, b: AttributeId) -> Result<Association> {
        self.check_pair(a, b)?;
        Ok(self.get(a, b))
    }

    /// Name-based [`query`](Self::query).
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` for an unknown name, otherwise as `query`.
    pub fn query_names(&self, a: &str, b: &str) -> Result<Association> {
        self.query(self.catalog.get_id(a)?, self.catalog.get_id(b)?)
    }

    /// Records that `a` and `b` are linked or excluded.
    ///
    /// Returns `true` if the pair was unknown before, `false` if it already
    /// held `relation`. A fresh link also excludes `a` from the rest of `b`'s
    /// category and `b` from the rest of `a`'s category. The store is left
    /// unchanged on error.
    ///
    /// # Errors
    ///
    /// - `InvalidPair` if `a == b`.
    /// - `OutOfRange` if either id is not an attribute of this puzzle.
    /// - `Contradiction` if the pair, or one of the pairs the link would
    ///   exclude, already holds the opposite value.
    pub fn assert(&mut self, a: AttributeId, b: AttributeId, relation: Relation) -> Result<bool> {
        self.check_pair(a, b)?;

        let existing = self.get(a, b);
        match existing.relation() {
            Some(held) if held == relation => return Ok(false),
            Some(_) => {
                return Err(self.contradiction(a, b, existing, relation));
            }
            None => {}
        }

        let mut cascade: SmallVec<[(AttributeId, AttributeId); 16]> = SmallVec::new();
        if relation == Relation::Linked {
            let others_a = self
                .catalog
                .category_range(self.catalog.category_of(a))
                .filter(|&other| other != a)
                .map(|other| (other, b));
            let others_b = self
                .catalog
                .category_range(self.catalog.category_of(b))
                .filter(|&other| other != b)
                .map(|other| (a, other));

            for (x, y) in others_a.chain(others_b) {
                match self.get(x, y) {
                    Association::Unknown => cascade.push((x, y)),
                    Association::Excluded => {}
                    existing @ Association::Linked => {
                        return Err(self.contradiction(x, y, existing, Relation::Excluded));
                    }
                }
            }
        }

        self.set(a, b, relation);
        for &(x, y) in &cascade {
            self.set(x, y, Relation::Excluded);
        }
        trace!(a, b, %relation, cascaded = cascade.len(), "asserted");

        Ok(true)
    }

    /// Name-based [`assert`](Self::assert).
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` for an unknown name, otherwise as `assert`.
    pub fn assert_names(&mut self, a: &str, b: &str, relation: Relation) -> Result<bool> {
        let a = self.catalog.get_id(a)?;
        let b = self.catalog.get_id(b)?;
        self.assert(a, b, relation)
    }

    /// Counts behind [`percent_solved`](Self::percent_solved).
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Approximate completion in `[0, 100]`: 0 for a fresh store, 100 once
    /// every pair is determined.
    #[must_use]
    pub fn percent_solved(&self) -> f64 {
        self.progress.percent()
    }

    /// True once no cross-category pair is unknown.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.progress.is_complete()
    }

    /// All linked pairs `(a, b)` with `a < b`.
    pub fn linked_pairs(&self) -> impl Iterator<Item = (AttributeId, AttributeId)> + '_ {
        let total = self.total;
        (0..total).flat_map(move |a| {
            let start = self.catalog.category_range(self.catalog.category_of(a)).end;
            (start..total)
                .filter(move |&b| self.get(a, b).is_linked())
                .map(move |b| (a, b))
        })
    }

    /// The attribute of `category` linked to `id`, if known.
    #[must_use]
    pub fn partner(&self, id: AttributeId, category: usize) -> Option<AttributeId> {
        if self.catalog.category_of(id) == category {
            return Some(id);
        }
        self.catalog
            .category_range(category)
            .find(|&other| self.get(id, other).is_linked())
    }

    /// One row per attribute of the first category, holding the attribute
    /// linked to it in each category (`None` where still unknown).
    #[must_use]
    pub fn entities(&self) -> Vec<Vec<Option<AttributeId>>> {
        self.catalog
            .category_range(0)
            .map(|anchor| {
                (0..self.catalog.num_categories())
                    .map(|category| self.partner(anchor, category))
                    .collect()
            })
            .collect()
    }

    /// The full mapping, once every entity is determined.
    #[must_use]
    pub fn solution(&self) -> Option<Vec<Vec<AttributeId>>> {
        self.entities()
            .into_iter()
            .map(|row| row.into_iter().collect::<Option<Vec<_>>>())
            .collect()
    }
}
