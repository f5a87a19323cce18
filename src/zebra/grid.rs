//! Terminal rendering of the association grid.
//!
//! The layout follows the usual paper grid: rows for every category but the
//! last, columns for every category but the first, and only the upper
//! triangle of category blocks filled in. Each cell shows
//! [`Association::symbol`](crate::zebra::association::Association::symbol).

use crate::zebra::store::AssociationStore;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Grid view of a store.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a>(pub &'a AssociationStore);

impl Display for Grid<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let store = self.0;
        let catalog = store.catalog();
        let k = catalog.num_categories();
        let m = catalog.per_category();

        let cw = catalog.categories().map(str::len).max().unwrap_or(0);
        let aw = (0..catalog.total())
            .map(|id| catalog.name(id).len())
            .max()
            .unwrap_or(1);
        let block = m * (aw + 1);
        let margin = " ".repeat(cw + aw + 2);

        write!(f, "{margin}|")?;
        for kj in 1..k {
            let name: String = catalog.category_name(kj).chars().take(block - 1).collect();
            write!(f, " {name:<width$}|", width = block - 1)?;
        }
        writeln!(f)?;

        write!(f, "{margin}|")?;
        for kj in 1..k {
            for name in catalog.names_in(kj) {
                write!(f, " {name:>aw$}")?;
            }
            write!(f, "|")?;
        }
        writeln!(f)?;

        let rule = "-".repeat(cw + aw + 2 + k.saturating_sub(1) * (block + 1) + 1);
        writeln!(f, "{rule}")?;

        for ki in 0..k.saturating_sub(1) {
            for (row, x) in catalog.category_range(ki).enumerate() {
                let label = if row == 0 { catalog.category_name(ki) } else { "" };
                write!(f, "{label:<cw$} {:<aw$} |", catalog.name(x))?;
                for kj in 1..k {
                    for y in catalog.category_range(kj) {
                        let symbol = if kj <= ki { '-' } else { store.get(x, y).symbol() };
                        write!(f, " {symbol:>aw$}")?;
                    }
                    write!(f, "|")?;
                }
                writeln!(f)?;
            }
            writeln!(f, "{rule}")?;
        }

        write!(
            f,
            "Filled about {:.0}% of the puzzle.",
            store.percent_solved()
        )
    }
}

/// One line per hidden entity, `?` where a category is still undetermined.
#[derive(Debug, Clone, Copy)]
pub struct Entities<'a>(pub &'a AssociationStore);

impl Display for Entities<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let catalog = self.0.catalog();
        writeln!(f, "{}", catalog.categories().join(" | "))?;
        for row in self.0.entities() {
            let line = row
                .into_iter()
                .map(|slot| slot.map_or("?", |id| catalog.name(id)))
                .join(" | ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zebra::association::Relation;

    fn two_by_two() -> AssociationStore {
        AssociationStore::from_categories([("Color", ["Red", "Blue"]), ("Pet", ["Cat", "Dog"])])
            .unwrap()
    }

    #[test]
    fn test_grid_symbols() {
        let mut store = two_by_two();
        store.assert_names("Red", "Cat", Relation::Linked).unwrap();
        let rendered = Grid(&store).to_string();

        let red = rendered.lines().find(|l| l.contains("Red")).unwrap();
        assert!(red.starts_with("Color Red  |"));
        assert!(red.ends_with("o    x|"));
        let blue = rendered.lines().find(|l| l.contains("Blue |")).unwrap();
        assert!(blue.ends_with("x    .|"));
        assert!(rendered.ends_with("Filled about 83% of the puzzle."));
    }

    #[test]
    fn test_grid_lower_blocks_are_dashed() {
        let store = AssociationStore::from_categories([
            ("A", ["a1", "a2"]),
            ("B", ["b1", "b2"]),
            ("C", ["c1", "c2"]),
        ])
        .unwrap();
        let rendered = Grid(&store).to_string();
        let b1 = rendered.lines().find(|l| l.contains(" b1 |")).unwrap();
        assert!(b1.ends_with("|  -  -|  .  .|"));
        assert!(rendered.contains("Filled about 0% of the puzzle."));
    }

    #[test]
    fn test_entities() {
        let mut store = two_by_two();
        store.assert_names("Blue", "Cat", Relation::Linked).unwrap();
        let rendered = Entities(&store).to_string();
        assert_eq!(rendered, "Color | Pet\nRed | ?\nBlue | Cat\n");
    }
}
