#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Attributes, categories and the flattened id space.
//!
//! A puzzle is defined by `N` categories of `M` attributes each. Every
//! attribute has a flattened id in `[0, N * M)`, laid out category-major
//! (`id = category * M + index`), and a name that is unique across the puzzle
//! when compared case-insensitively.

use crate::zebra::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::ops::Range;

/// Flattened attribute id in `[0, total)`.
pub type AttributeId = usize;

/// An attribute addressed by its category and its position in that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute {
    /// Category index.
    pub category: usize,
    /// Position within the category.
    pub index: usize,
}

impl Attribute {
    /// An attribute at `index` within `category`.
    #[must_use]
    pub const fn new(category: usize, index: usize) -> Self {
        Self { category, index }
    }
}

/// The category → attribute-name definition of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<String>,
    names: Vec<String>,
    per_category: usize,
    lookup: FxHashMap<String, AttributeId>,
}

impl Catalog {
    /// Builds a catalog from `(category, attributes)` pairs, in order.
    ///
    /// # Errors
    ///
    /// - `EmptyPuzzle` if there are no categories, or the first has no attributes.
    /// - `UnevenCategory` if a category's size differs from the first one's.
    /// - `DuplicateAttribute` if two attributes share a name, ignoring case.
    pub fn new<I, C, A, S>(definition: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, A)>,
        C: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut lookup = FxHashMap::default();
        let mut per_category = None;

        for (category, attributes) in definition {
            let category = category.into();
            let start = names.len();

            for name in attributes {
                let name = name.into();
                let key = name.to_lowercase();
                if lookup.insert(key, names.len()).is_some() {
                    return Err(Error::DuplicateAttribute(name));
                }
                names.push(name);
            }

            let actual = names.len() - start;
            match per_category {
                None => per_category = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(Error::UnevenCategory {
                        category,
                        expected,
                        actual,
                    });
                }
                Some(_) => {}
            }
            categories.push(category);
        }

        match per_category {
            Some(per_category) if per_category > 0 => Ok(Self {
                categories,
                names,
                per_category,
                lookup,
            }),
            _ => Err(Error::EmptyPuzzle),
        }
    }

    /// Number of categories, `N`.
    #[must_use]
    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// Attributes per category, `M`.
    #[must_use]
    pub const fn per_category(&self) -> usize {
        self.per_category
    }

    /// Total number of attributes, `N * M`.
    #[must_use]
    pub fn total(&self) -> usize {
        self.names.len()
    }

    /// Category that `id` belongs to.
    #[must_use]
    pub const fn category_of(&self, id: AttributeId) -> usize {
        id / self.per_category
    }

    /// True if both ids share a category.
    #[must_use]
    pub const fn same_category(&self, a: AttributeId, b: AttributeId) -> bool {
        self.category_of(a) == self.category_of(b)
    }

    /// Category and position of `id`.
    #[must_use]
    pub const fn attribute(&self, id: AttributeId) -> Attribute {
        Attribute::new(id / self.per_category, id % self.per_category)
    }

    /// Inverse of [`attribute`](Self::attribute).
    #[must_use]
    pub const fn id_of(&self, attribute: Attribute) -> AttributeId {
        attribute.category * self.per_category + attribute.index
    }

    /// The ids belonging to `category`.
    #[must_use]
    pub const fn category_range(&self, category: usize) -> Range<AttributeId> {
        category * self.per_category..(category + 1) * self.per_category
    }

    /// Case-insensitive exact lookup of an attribute id by name.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` if no attribute carries `name`.
    pub fn get_id(&self, name: &str) -> Result<AttributeId> {
        self.lookup
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    /// Category index of the attribute called `name`.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` if no attribute carries `name`.
    pub fn category_of_name(&self, name: &str) -> Result<usize> {
        self.get_id(name).map(|id| self.category_of(id))
    }

    /// Checks that `id` addresses an attribute of this puzzle.
    ///
    /// # Errors
    ///
    /// `OutOfRange` otherwise.
    pub fn check(&self, id: AttributeId) -> Result<AttributeId> {
        if id < self.total() {
            Ok(id)
        } else {
            Err(Error::OutOfRange {
                id,
                total: self.total(),
            })
        }
    }

    /// Display name of an attribute, as given in the definition.
    ///
    /// # Panics
    ///
    /// If `id` is out of range.
    #[must_use]
    pub fn name(&self, id: AttributeId) -> &str {
        &self.names[id]
    }

    /// # Panics
    ///
    /// If `category` is out of range.
    #[must_use]
    pub fn category_name(&self, category: usize) -> &str {
        &self.categories[category]
    }

    /// Category names, in definition order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Names of the attributes of `category`, in order.
    pub fn names_in(&self, category: usize) -> impl Iterator<Item = &str> {
        self.names[self.category_range(category)]
            .iter()
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colours_and_pets() -> Catalog {
        Catalog::new([
            ("Color", vec!["Red", "Blue", "Green"]),
            ("Pet", vec!["Cat", "Dog", "Fish"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_layout_is_category_major() {
        let catalog = colours_and_pets();
        assert_eq!(catalog.num_categories(), 2);
        assert_eq!(catalog.per_category(), 3);
        assert_eq!(catalog.total(), 6);
        assert_eq!(catalog.category_of(2), 0);
        assert_eq!(catalog.category_of(3), 1);
        assert_eq!(catalog.attribute(4), Attribute::new(1, 1));
        assert_eq!(catalog.id_of(Attribute::new(1, 1)), 4);
        assert_eq!(catalog.category_range(1), 3..6);
    }

    #[test]
    fn test_get_id_ignores_case() {
        let catalog = colours_and_pets();
        assert_eq!(catalog.get_id("red").unwrap(), 0);
        assert_eq!(catalog.get_id("DOG").unwrap(), 4);
        assert_eq!(catalog.name(4), "Dog");
        assert_eq!(catalog.category_of_name("fish").unwrap(), 1);
    }

    #[test]
    fn test_get_id_unknown() {
        let catalog = colours_and_pets();
        assert!(matches!(
            catalog.get_id("zebra"),
            Err(Error::UnknownAttribute(name)) if name == "zebra"
        ));
    }

    #[test]
    fn test_uneven_categories_rejected() {
        let result = Catalog::new([("Color", vec!["Red", "Blue"]), ("Pet", vec!["Cat"])]);
        assert!(matches!(
            result,
            Err(Error::UnevenCategory { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Catalog::new([("Color", vec!["Red", "Blue"]), ("Mood", vec!["blue", "Calm"])]);
        assert!(matches!(result, Err(Error::DuplicateAttribute(name)) if name == "blue"));
    }

    #[test]
    fn test_empty_rejected() {
        let none: Vec<(&str, Vec<&str>)> = vec![];
        assert!(matches!(Catalog::new(none), Err(Error::EmptyPuzzle)));
        let empty: Vec<(&str, Vec<&str>)> = vec![("Color", vec![])];
        assert!(matches!(Catalog::new(empty), Err(Error::EmptyPuzzle)));
    }

    #[test]
    fn test_check_range() {
        let catalog = colours_and_pets();
        assert_eq!(catalog.check(5).unwrap(), 5);
        assert!(matches!(
            catalog.check(6),
            Err(Error::OutOfRange { id: 6, total: 6 })
        ));
    }

    #[test]
    fn test_names_in_category() {
        let catalog = colours_and_pets();
        assert_eq!(catalog.names_in(1).collect::<Vec<_>>(), vec!["Cat", "Dog", "Fish"]);
        assert_eq!(catalog.categories().collect::<Vec<_>>(), vec!["Color", "Pet"]);
    }
}
