//! Solved-percentage estimate.
//!
//! Every determined cross-category pair contributes a weight: `LINK_WEIGHT`
//! for a link and `EXCLUSION_WEIGHT` for an exclusion. Same-category pairs
//! are fixed at construction and contribute nothing, so a fresh grid weighs
//! zero. A solved grid of `N` categories with `M` attributes each holds
//! `N(N-1)/2 * M` links and excludes every other cross pair, which gives the
//! maximum weight used as the denominator.
//!
//! The percentage is a progress estimate, not a correctness check: on a
//! consistent grid it never decreases and reaches 100 exactly when every
//! pair is determined.

/// Weight of a linked pair.
pub const LINK_WEIGHT: u64 = 1;

/// Weight of an excluded pair.
pub const EXCLUSION_WEIGHT: u64 = 2;

/// Raw counts behind the solved percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Progress {
    /// Cross-category pairs currently linked.
    pub linked: usize,
    /// Cross-category pairs currently excluded.
    pub excluded: usize,
    /// Number of unordered cross-category pairs.
    pub cross_pairs: usize,
    /// Links present once the puzzle is solved.
    pub expected_links: usize,
}

impl Progress {
    /// Progress of a fresh grid with `categories` categories of `per_category` attributes.
    #[must_use]
    pub const fn empty(categories: usize, per_category: usize) -> Self {
        let category_pairs = categories * categories.saturating_sub(1) / 2;
        Self {
            linked: 0,
            excluded: 0,
            cross_pairs: category_pairs * per_category * per_category,
            expected_links: category_pairs * per_category,
        }
    }

    /// Current weight of the determined pairs.
    #[must_use]
    pub const fn weight(&self) -> u64 {
        self.linked as u64 * LINK_WEIGHT + self.excluded as u64 * EXCLUSION_WEIGHT
    }

    /// Weight of a fully solved grid.
    #[must_use]
    pub const fn max_weight(&self) -> u64 {
        self.expected_links as u64 * LINK_WEIGHT
            + (self.cross_pairs - self.expected_links) as u64 * EXCLUSION_WEIGHT
    }

    /// Cross-category pairs still undetermined.
    #[must_use]
    pub const fn unknown(&self) -> usize {
        self.cross_pairs - self.linked - self.excluded
    }

    /// Every cross-category pair is determined.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unknown() == 0
    }

    /// Solved percentage in `[0, 100]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        let max = self.max_weight();
        if max == 0 {
            return 100.0;
        }
        (100.0 * self.weight() as f64 / max as f64).clamp(0.0, 100.0)
    }
}
