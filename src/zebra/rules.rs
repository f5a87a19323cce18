#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Deduction rules.
//!
//! A rule inspects the store and returns the facts it can prove that are not
//! yet recorded. Rules never write; the engine decides when to apply what
//! they find. A proven fact may contradict what the store holds, in which
//! case applying it fails and the inconsistency surfaces to the caller.
//!
//! Two rules are provided:
//!
//! - [`Elimination`]: if `x` is linked to `y` and `z` is excluded from `y`,
//!   then `z` is excluded from `x` as well.
//! - [`Completion`]: if all but one attribute of a category are excluded
//!   from `x`, the remaining one is linked to `x`.

use crate::zebra::association::{Association, Relation};
use crate::zebra::attribute::AttributeId;
use crate::zebra::store::AssociationStore;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Debug, Display};

/// A fact proven by a rule, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deduction {
    /// Lower attribute id.
    pub a: AttributeId,
    /// Higher attribute id.
    pub b: AttributeId,
    /// What was proven about the pair.
    pub relation: Relation,
}

impl Deduction {
    /// Normalizes the pair so that `a < b`.
    #[must_use]
    pub const fn new(a: AttributeId, b: AttributeId, relation: Relation) -> Self {
        if a < b {
            Self { a, b, relation }
        } else {
            Self { a: b, b: a, relation }
        }
    }

    /// Shorthand for a [`Relation::Linked`] deduction.
    #[must_use]
    pub const fn linked(a: AttributeId, b: AttributeId) -> Self {
        Self::new(a, b, Relation::Linked)
    }

    /// Shorthand for a [`Relation::Excluded`] deduction.
    #[must_use]
    pub const fn excluded(a: AttributeId, b: AttributeId) -> Self {
        Self::new(a, b, Relation::Excluded)
    }
}

/// Which rule produced an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Supplied by the caller.
    Clue,
    /// Found by [`Elimination`].
    Elimination,
    /// Found by [`Completion`].
    Completion,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clue => write!(f, "clue"),
            Self::Elimination => write!(f, "elimination"),
            Self::Completion => write!(f, "completion"),
        }
    }
}

/// A deduction rule over the association store.
pub trait Rule: Debug {
    /// Label recorded on the trail for this rule's deductions.
    fn kind(&self) -> RuleKind;

    /// Facts this rule proves from the current store that are not recorded
    /// yet, without duplicates, in scan order.
    fn deduce(&self, store: &AssociationStore) -> Vec<Deduction>;
}

/// Elimination by exclusion.
///
/// For every linked pair `(x, y)` and every `z` excluded from `y` whose
/// category is neither `x`'s nor `y`'s, `(x, z)` is excluded. The same scan
/// runs with the roles of `x` and `y` swapped. A linked `(x, z)` is reported
/// too, since it cannot hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elimination;

impl Elimination {
    fn scan(store: &AssociationStore, x: AttributeId, y: AttributeId, out: &mut Vec<Deduction>) {
        let catalog = store.catalog();
        let kx = catalog.category_of(x);
        let ky = catalog.category_of(y);

        for z in 0..catalog.total() {
            let kz = catalog.category_of(z);
            if kz == kx || kz == ky {
                continue;
            }
            if store.get(z, y).is_excluded() && !store.get(x, z).is_excluded() {
                out.push(Deduction::excluded(x, z));
            }
        }
    }
}

impl Rule for Elimination {
    fn kind(&self) -> RuleKind {
        RuleKind::Elimination
    }

    fn deduce(&self, store: &AssociationStore) -> Vec<Deduction> {
        let mut out = Vec::new();
        for (x, y) in store.linked_pairs() {
            Self::scan(store, x, y, &mut out);
            Self::scan(store, y, x, &mut out);
        }
        out.into_iter().unique().collect()
    }
}

/// Completion by count.
///
/// For every pair of categories `(Ki, Kj)` and every `x` in `Ki`, if exactly
/// one attribute of `Kj` is not excluded from `x` and it is still unknown, it
/// must be linked to `x`. The same count runs from `Kj` against `Ki`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Completion;

impl Completion {
    fn scan(store: &AssociationStore, from: usize, against: usize, out: &mut Vec<Deduction>) {
        let catalog = store.catalog();
        for x in catalog.category_range(from) {
            let open: SmallVec<[AttributeId; 8]> = catalog
                .category_range(against)
                .filter(|&y| !store.get(x, y).is_excluded())
                .collect();

            if let [y] = open.as_slice() {
                if store.get(x, *y) == Association::Unknown {
                    out.push(Deduction::linked(x, *y));
                }
            }
        }
    }
}

impl Rule for Completion {
    fn kind(&self) -> RuleKind {
        RuleKind::Completion
    }

    fn deduce(&self, store: &AssociationStore) -> Vec<Deduction> {
        let mut out = Vec::new();
        for (ki, kj) in (0..store.catalog().num_categories()).tuple_combinations() {
            Self::scan(store, ki, kj, &mut out);
            Self::scan(store, kj, ki, &mut out);
        }
        out.into_iter().unique().collect()
    }
}
