//! The three-valued state recorded for every pair of attributes.
//!
//! A pair of attributes is either known to describe the same hidden entity
//! (`Linked`), known to describe different entities (`Excluded`), or not yet
//! determined (`Unknown`). Callers that write into the store use the
//! two-valued [`Relation`] instead, so that "assert unknown" cannot be expressed.

use std::fmt::Display;

/// State of an unordered pair of attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Association {
    /// Nothing is known about the pair yet.
    #[default]
    Unknown,
    /// Both attributes belong to the same hidden entity.
    Linked,
    /// The attributes belong to different hidden entities.
    Excluded,
}

impl Association {
    /// True once the pair is linked or excluded.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// True while nothing is known about the pair.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// True for [`Association::Linked`].
    #[must_use]
    pub const fn is_linked(self) -> bool {
        matches!(self, Self::Linked)
    }

    /// True for [`Association::Excluded`].
    #[must_use]
    pub const fn is_excluded(self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// The definite relation held by this pair, if any.
    #[must_use]
    pub const fn relation(self) -> Option<Relation> {
        match self {
            Self::Unknown => None,
            Self::Linked => Some(Relation::Linked),
            Self::Excluded => Some(Relation::Excluded),
        }
    }

    /// Grid symbol for the pair: `o` linked, `x` excluded, `.` unknown.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Unknown => '.',
            Self::Linked => 'o',
            Self::Excluded => 'x',
        }
    }
}

impl Display for Association {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Linked => write!(f, "linked"),
            Self::Excluded => write!(f, "excluded"),
        }
    }
}

/// A definite value that can be asserted for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Same hidden entity.
    Linked,
    /// Different hidden entities.
    Excluded,
}

impl Relation {
    /// The other relation.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Linked => Self::Excluded,
            Self::Excluded => Self::Linked,
        }
    }
}

impl From<Relation> for Association {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Linked => Self::Linked,
            Relation::Excluded => Self::Excluded,
        }
    }
}

impl From<bool> for Relation {
    /// `true` is a positive association, `false` a negative one.
    fn from(linked: bool) -> Self {
        if linked { Self::Linked } else { Self::Excluded }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Association::from(*self).fmt(f)
    }
}
