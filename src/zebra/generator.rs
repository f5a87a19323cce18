#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random puzzle generation.
//!
//! A generated puzzle starts from a hidden one-to-one solution drawn with a
//! seeded [`fastrand::Rng`], then samples true clues from it. The clues are
//! always consistent, but nothing guarantees that propagation alone can
//! solve the result.

use crate::zebra::association::{Association, Relation};
use crate::zebra::attribute::AttributeId;
use crate::zebra::puzzle::{Clue, Puzzle};
use crate::zebra::store::AssociationStore;
use fastrand::Rng;
use itertools::Itertools;

/// Shape and clue mix of a generated puzzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Number of categories.
    pub categories: usize,
    /// Attributes per category.
    pub per_category: usize,
    /// Number of clues to sample; they may repeat.
    pub clues: usize,
    /// Chance that a sampled clue is a link rather than an exclusion.
    pub link_probability: f64,
    /// Seed for the random generator; equal seeds give equal puzzles.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            categories: 4,
            per_category: 5,
            clues: 20,
            link_probability: 0.3,
            seed: 0,
        }
    }
}

/// A generated puzzle and the solution it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// The puzzle, with clues in sampling order.
    pub puzzle: Puzzle,
    /// `entity_of[id]` is the hidden entity that attribute `id` belongs to.
    pub entity_of: Vec<usize>,
    per_category: usize,
}

impl Generated {
    /// Whether `a` and `b` belong to the same hidden entity.
    #[must_use]
    pub fn truth(&self, a: AttributeId, b: AttributeId) -> Relation {
        Relation::from(self.entity_of[a] == self.entity_of[b])
    }

    /// Checks every determined pair of `store` against the hidden solution.
    #[must_use]
    pub fn agrees_with(&self, store: &AssociationStore) -> bool {
        (0..self.entity_of.len())
            .tuple_combinations()
            .filter(|&(a, b)| a / self.per_category != b / self.per_category)
            .all(|(a, b)| match store.query(a, b) {
                Ok(Association::Unknown) => true,
                Ok(known) => known.relation() == Some(self.truth(a, b)),
                Err(_) => false,
            })
    }

    /// Clues linking every entity across every category pair, enough to
    /// determine the whole grid without propagation.
    #[must_use]
    pub fn full_clues(&self) -> Vec<Clue> {
        let names = self
            .puzzle
            .categories
            .iter()
            .flat_map(|(_, attributes)| attributes.iter())
            .collect_vec();
        (0..self.entity_of.len())
            .tuple_combinations()
            .filter(|&(a, b)| {
                a / self.per_category != b / self.per_category
                    && self.truth(a, b) == Relation::Linked
            })
            .map(|(a, b)| Clue::new(names[a].as_str(), names[b].as_str(), Relation::Linked))
            .collect()
    }
}

fn category_name(category: usize) -> String {
    format!("k{category}")
}

fn attribute_name(category: usize, index: usize) -> String {
    format!("k{category}v{index}")
}

/// Draws a hidden solution and `config.clues` true clues from it.
///
/// Clues may repeat. A puzzle with fewer than two categories gets no clues.
#[must_use]
pub fn generate(config: &GeneratorConfig) -> Generated {
    let mut rng = Rng::with_seed(config.seed);
    let m = config.per_category;

    // layout[k][e]: index within category k of the attribute owned by entity e.
    let layout = (0..config.categories)
        .map(|_| {
            let mut order = (0..m).collect_vec();
            rng.shuffle(&mut order);
            order
        })
        .collect_vec();

    let mut entity_of = vec![0; config.categories * m];
    for (k, order) in layout.iter().enumerate() {
        for (entity, &index) in order.iter().enumerate() {
            entity_of[k * m + index] = entity;
        }
    }

    let categories = (0..config.categories)
        .map(|k| {
            (
                category_name(k),
                (0..m).map(|i| attribute_name(k, i)).collect_vec(),
            )
        })
        .collect_vec();

    let mut clues = Vec::with_capacity(config.clues);
    if config.categories >= 2 && m > 0 {
        for _ in 0..config.clues {
            let k1 = rng.usize(..config.categories);
            let k2 = (k1 + 1 + rng.usize(..config.categories - 1)) % config.categories;
            let entity = rng.usize(..m);

            let link = m == 1 || rng.f64() < config.link_probability;
            let other = if link {
                entity
            } else {
                (entity + 1 + rng.usize(..m - 1)) % m
            };

            clues.push(Clue::new(
                attribute_name(k1, layout[k1][entity]),
                attribute_name(k2, layout[k2][other]),
                Relation::from(link),
            ));
        }
    }

    Generated {
        puzzle: Puzzle { categories, clues },
        entity_of,
        per_category: m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zebra::engine::EngineConfig;

    #[test]
    fn test_same_seed_same_puzzle() {
        let config = GeneratorConfig {
            seed: 42,
            ..GeneratorConfig::default()
        };
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn test_shape() {
        let generated = generate(&GeneratorConfig {
            categories: 3,
            per_category: 4,
            clues: 7,
            ..GeneratorConfig::default()
        });
        assert_eq!(generated.puzzle.categories.len(), 3);
        assert!(generated.puzzle.categories.iter().all(|(_, a)| a.len() == 4));
        assert_eq!(generated.puzzle.clues.len(), 7);
        assert_eq!(generated.entity_of.len(), 12);
    }

    #[test]
    fn test_single_category_has_no_clues() {
        let generated = generate(&GeneratorConfig {
            categories: 1,
            ..GeneratorConfig::default()
        });
        assert!(generated.puzzle.clues.is_empty());
    }

    #[test]
    fn test_propagation_is_sound() {
        for seed in 0..40 {
            let generated = generate(&GeneratorConfig {
                categories: 4,
                per_category: 5,
                clues: 25,
                link_probability: 0.25,
                seed,
            });
            let mut engine = generated
                .puzzle
                .clone()
                .into_engine(EngineConfig::default())
                .unwrap();

            let mut last = engine.percent_solved();
            loop {
                let found = engine.pass().unwrap();
                let now = engine.percent_solved();
                assert!(now >= last, "seed {seed}: percent went down");
                assert!((0.0..=100.0).contains(&now));
                last = now;
                if found == 0 {
                    break;
                }
            }

            assert!(generated.agrees_with(engine.store()), "seed {seed}: unsound deduction");
            let store = engine.store();
            let total = store.catalog().total();
            for (a, b) in (0..total).tuple_combinations() {
                assert_eq!(store.query(a, b).unwrap(), store.query(b, a).unwrap());
                if store.catalog().same_category(a, b) {
                    assert_eq!(store.query(a, b).unwrap(), Association::Excluded);
                }
            }
        }
    }

    #[test]
    fn test_full_clues_solve_the_grid() {
        let mut generated = generate(&GeneratorConfig {
            categories: 5,
            per_category: 5,
            clues: 0,
            seed: 7,
            ..GeneratorConfig::default()
        });
        generated.puzzle.clues = generated.full_clues();
        assert_eq!(generated.puzzle.clues.len(), 10 * 5);

        let mut engine = generated
            .puzzle
            .clone()
            .into_engine(EngineConfig::default())
            .unwrap();
        engine.iterate().unwrap();
        assert!(engine.store().is_solved());
        assert!((engine.percent_solved() - 100.0).abs() < f64::EPSILON);
        assert!(generated.agrees_with(engine.store()));
    }

    #[test]
    fn test_spanning_links_are_completed_by_propagation() {
        // Linking category 0 to every other category is enough; the links
        // between the other categories follow by elimination and completion.
        let mut generated = generate(&GeneratorConfig {
            categories: 4,
            per_category: 4,
            clues: 0,
            seed: 3,
            ..GeneratorConfig::default()
        });
        generated.puzzle.clues = generated
            .full_clues()
            .into_iter()
            .filter(|clue| clue.a.starts_with("k0v"))
            .collect();
        assert_eq!(generated.puzzle.clues.len(), 3 * 4);

        let mut engine = generated
            .puzzle
            .clone()
            .into_engine(EngineConfig::default())
            .unwrap();
        let stats = engine.iterate().unwrap();
        assert!(stats.converged);
        assert!(engine.store().is_solved());
        assert!(stats.deductions() > 0);
        assert!(generated.agrees_with(engine.store()));
    }
}
