#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The propagation engine.
//!
//! The engine owns an [`AssociationStore`] and drives the deduction rules
//! over it. One *pass* runs [`Elimination`] over all linked pairs followed by
//! [`Completion`] over all category pairs. [`PropagationEngine::iterate`]
//! repeats passes until one leaves the solved weight unchanged, which is the
//! fixed point: every pass either records new facts or proves nothing, and
//! the number of facts is bounded by the number of pairs.
//!
//! Every write made through the engine, clue or deduction, is appended to a
//! trail in the order it happened.

use crate::zebra::association::{Association, Relation};
use crate::zebra::attribute::AttributeId;
use crate::zebra::error::Result;
use crate::zebra::rules::{Completion, Deduction, Elimination, Rule, RuleKind};
use crate::zebra::store::AssociationStore;
use tracing::{debug, info, trace, warn};

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Upper bound on the passes a single `iterate` call may run.
    /// `None` runs to the fixed point. `Some(0)` still runs one pass.
    pub max_passes: Option<usize>,
}

/// One entry of the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// The fact that was recorded.
    pub deduction: Deduction,
    /// What produced it.
    pub rule: RuleKind,
    /// Pass during which the step was recorded; 0 for clues given before
    /// the first pass.
    pub pass: usize,
}

/// Counters collected while propagating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropagationStats {
    /// Passes run over the engine's lifetime.
    pub passes: usize,
    /// Clues that changed the store.
    pub clues: usize,
    /// Exclusions found by [`Elimination`].
    pub eliminations: usize,
    /// Links found by [`Completion`].
    pub completions: usize,
    /// The last `iterate` call reached the fixed point.
    pub converged: bool,
}

impl PropagationStats {
    /// Facts found by the rules, clues not included.
    #[must_use]
    pub const fn deductions(&self) -> usize {
        self.eliminations + self.completions
    }
}

/// Drives the deduction rules over a store and keeps the trail.
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    store: AssociationStore,
    config: EngineConfig,
    trail: Vec<Step>,
    stats: PropagationStats,
}

impl PropagationEngine {
    /// An engine with the default configuration.
    #[must_use]
    pub fn new(store: AssociationStore) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// An engine over `store` with the given settings.
    #[must_use]
    pub const fn with_config(store: AssociationStore, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            trail: Vec::new(),
            stats: PropagationStats {
                passes: 0,
                clues: 0,
                eliminations: 0,
                completions: 0,
                converged: false,
            },
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &AssociationStore {
        &self.store
    }

    /// Consumes the engine, returning its store.
    #[must_use]
    pub fn into_store(self) -> AssociationStore {
        self.store
    }

    /// The engine settings.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Counters collected so far.
    #[must_use]
    pub const fn stats(&self) -> PropagationStats {
        self.stats
    }

    /// Every assertion made through the engine, oldest first.
    #[must_use]
    pub fn trail(&self) -> &[Step] {
        &self.trail
    }

    /// See [`AssociationStore::percent_solved`].
    #[must_use]
    pub fn percent_solved(&self) -> f64 {
        self.store.percent_solved()
    }

    /// Symmetric lookup, see [`AssociationStore::query`].
    ///
    /// # Errors
    ///
    /// As `AssociationStore::query`.
    pub fn query(&self, a: AttributeId, b: AttributeId) -> Result<Association> {
        self.store.query(a, b)
    }

    /// Records a clue. Returns `true` if it was new.
    ///
    /// # Errors
    ///
    /// As [`AssociationStore::assert`].
    pub fn assert(&mut self, a: AttributeId, b: AttributeId, relation: Relation) -> Result<bool> {
        let fresh = self.store.assert(a, b, relation)?;
        if fresh {
            self.record(Deduction::new(a, b, relation), RuleKind::Clue);
            self.stats.converged = false;
        }
        Ok(fresh)
    }

    /// Records a clue by attribute names.
    ///
    /// # Errors
    ///
    /// `UnknownAttribute` for an unknown name, otherwise as [`assert`](Self::assert).
    pub fn assert_names(&mut self, a: &str, b: &str, relation: Relation) -> Result<bool> {
        let catalog = self.store.catalog();
        let a = catalog.get_id(a)?;
        let b = catalog.get_id(b)?;
        self.assert(a, b, relation)
    }

    fn record(&mut self, deduction: Deduction, rule: RuleKind) {
        match rule {
            RuleKind::Clue => self.stats.clues += 1,
            RuleKind::Elimination => self.stats.eliminations += 1,
            RuleKind::Completion => self.stats.completions += 1,
        }
        self.trail.push(Step {
            deduction,
            rule,
            pass: self.stats.passes,
        });
    }

    /// Runs `rule` once and applies what it finds, in order.
    ///
    /// Returns the deductions that changed the store. Deductions already
    /// covered by an earlier one's cascade are skipped.
    ///
    /// # Errors
    ///
    /// `Contradiction` if a deduction conflicts with the store. Deductions
    /// applied before the conflicting one are kept.
    pub fn apply<R: Rule>(&mut self, rule: &R) -> Result<Vec<Deduction>> {
        let kind = rule.kind();
        let found = rule.deduce(&self.store);
        let mut fresh = Vec::with_capacity(found.len());

        for deduction in found {
            match self.store.assert(deduction.a, deduction.b, deduction.relation) {
                Ok(true) => {
                    let catalog = self.store.catalog();
                    debug!(
                        rule = %kind,
                        a = catalog.name(deduction.a),
                        b = catalog.name(deduction.b),
                        relation = %deduction.relation,
                        "by simple logic"
                    );
                    self.record(deduction, kind);
                    fresh.push(deduction);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(rule = %kind, error = %e, "propagation stopped");
                    return Err(e);
                }
            }
        }

        Ok(fresh)
    }

    /// Elimination over every linked pair.
    ///
    /// # Errors
    ///
    /// `Contradiction` if the clues are inconsistent.
    pub fn exclude(&mut self) -> Result<Vec<Deduction>> {
        self.apply(&Elimination)
    }

    /// Completion over every pair of categories.
    ///
    /// # Errors
    ///
    /// `Contradiction` if the clues are inconsistent.
    pub fn find_solved(&mut self) -> Result<Vec<Deduction>> {
        self.apply(&Completion)
    }

    /// One full pass: elimination, then completion. Returns the number of
    /// new facts recorded.
    ///
    /// # Errors
    ///
    /// `Contradiction` if the clues are inconsistent; the pass is abandoned.
    pub fn pass(&mut self) -> Result<usize> {
        self.stats.passes += 1;
        trace!(pass = self.stats.passes, percent = self.percent_solved(), "pass started");

        let excluded = self.exclude()?.len();
        let linked = self.find_solved()?.len();

        trace!(pass = self.stats.passes, excluded, linked, "pass finished");
        Ok(excluded + linked)
    }

    /// Runs passes until one leaves the solved weight unchanged, or until
    /// `max_passes` is reached. At least one pass is run.
    ///
    /// # Errors
    ///
    /// `Contradiction` if the clues are inconsistent.
    pub fn iterate(&mut self) -> Result<PropagationStats> {
        let mut passes = 0;
        self.stats.converged = false;

        loop {
            let before = self.store.progress().weight();
            self.pass()?;
            passes += 1;

            if self.store.progress().weight() == before {
                self.stats.converged = true;
                break;
            }
            if self.config.max_passes.is_some_and(|max| passes >= max) {
                break;
            }
        }

        info!(
            passes,
            converged = self.stats.converged,
            solved = self.store.is_solved(),
            percent = self.percent_solved(),
            "propagation finished"
        );
        Ok(self.stats)
    }
}

impl From<AssociationStore> for PropagationEngine {
    fn from(store: AssociationStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zebra::error::Error;

    fn two_by_two() -> PropagationEngine {
        AssociationStore::from_categories([("Color", ["Red", "Blue"]), ("Pet", ["Cat", "Dog"])])
            .unwrap()
            .into()
    }

    fn three_by_three() -> PropagationEngine {
        AssociationStore::from_categories([
            ("Color", ["Red", "Blue", "Green"]),
            ("Pet", ["Cat", "Dog", "Fish"]),
            ("Drink", ["Tea", "Milk", "Water"]),
        ])
        .unwrap()
        .into()
    }

    fn assoc(engine: &PropagationEngine, a: &str, b: &str) -> Association {
        engine.store().query_names(a, b).unwrap()
    }

    #[test]
    fn test_two_by_two_solves() {
        let mut engine = two_by_two();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        assert_eq!(assoc(&engine, "Red", "Dog"), Association::Excluded);
        assert_eq!(assoc(&engine, "Blue", "Cat"), Association::Excluded);

        let stats = engine.iterate().unwrap();
        assert_eq!(assoc(&engine, "Blue", "Dog"), Association::Linked);
        assert!((engine.percent_solved() - 100.0).abs() < f64::EPSILON);
        assert!(stats.converged);
        assert_eq!(stats.clues, 1);
        assert_eq!(stats.completions, 1);
        assert_eq!(
            engine.trail().last().map(|step| step.rule),
            Some(RuleKind::Completion)
        );
    }

    #[test]
    fn test_inferred_value_cannot_be_overturned() {
        let mut engine = two_by_two();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.iterate().unwrap();

        let err = engine
            .assert_names("Blue", "Dog", Relation::Excluded)
            .unwrap_err();
        assert!(err.is_contradiction());
        assert_eq!(assoc(&engine, "Blue", "Dog"), Association::Linked);
    }

    #[test]
    fn test_three_by_three_orders_deductions() {
        let mut engine = three_by_three();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.assert_names("Blue", "Tea", Relation::Linked).unwrap();
        engine.assert_names("Dog", "Milk", Relation::Excluded).unwrap();
        engine.assert_names("Green", "Water", Relation::Excluded).unwrap();

        engine.iterate().unwrap();
        assert!(engine.store().is_solved());

        let catalog = engine.store().catalog();
        let cat_tea = Deduction::excluded(catalog.get_id("Cat").unwrap(), catalog.get_id("Tea").unwrap());
        let trail = engine.trail();
        let exclusion_at = trail
            .iter()
            .position(|step| step.deduction == cat_tea)
            .unwrap();
        let first_link = trail
            .iter()
            .position(|step| step.rule == RuleKind::Completion)
            .unwrap();
        assert_eq!(trail[exclusion_at].rule, RuleKind::Elimination);
        assert!(exclusion_at < first_link);

        // Replay the trail on a fresh store: every completion must find its
        // category already narrowed down to one candidate.
        let mut replay = AssociationStore::new(catalog.clone());
        let per_category = catalog.per_category();
        for step in trail {
            let Deduction { a, b, relation } = step.deduction;
            if step.rule == RuleKind::Completion {
                let excluded_b = catalog
                    .category_range(catalog.category_of(b))
                    .filter(|&y| replay.query(a, y).unwrap().is_excluded())
                    .count();
                let excluded_a = catalog
                    .category_range(catalog.category_of(a))
                    .filter(|&x| replay.query(x, b).unwrap().is_excluded())
                    .count();
                assert!(
                    excluded_b == per_category - 1 || excluded_a == per_category - 1,
                    "link {a}-{b} recorded before its exclusions"
                );
            }
            replay.assert(a, b, relation).unwrap();
        }
        assert_eq!(&replay, engine.store());

        let names: Vec<Vec<&str>> = engine
            .store()
            .solution()
            .unwrap()
            .into_iter()
            .map(|row| row.into_iter().map(|id| catalog.name(id)).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["Red", "Cat", "Water"],
                vec!["Blue", "Dog", "Tea"],
                vec!["Green", "Fish", "Milk"],
            ]
        );
    }

    #[test]
    fn test_inconsistent_clues_surface_contradiction() {
        let mut engine = three_by_three();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.assert_names("Cat", "Tea", Relation::Linked).unwrap();
        engine.assert_names("Red", "Tea", Relation::Excluded).unwrap();

        let err = engine.iterate().unwrap_err();
        assert!(matches!(
            err,
            Error::Contradiction {
                existing: Association::Linked,
                requested: Relation::Excluded,
                ..
            }
        ));
        assert!(!engine.stats().converged);
    }

    #[test]
    fn test_percent_never_decreases() {
        let mut engine = three_by_three();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.assert_names("Blue", "Tea", Relation::Linked).unwrap();
        engine.assert_names("Green", "Water", Relation::Excluded).unwrap();

        let mut last = engine.percent_solved();
        for _ in 0..10 {
            engine.pass().unwrap();
            let now = engine.percent_solved();
            assert!(now >= last);
            assert!((0.0..=100.0).contains(&now));
            last = now;
        }
    }

    #[test]
    fn test_fresh_puzzle_converges_immediately() {
        let mut engine = three_by_three();
        let stats = engine.iterate().unwrap();
        assert_eq!(stats.passes, 1);
        assert!(stats.converged);
        assert_eq!(stats.deductions(), 0);
        assert!(engine.percent_solved().abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_passes_stops_early() {
        let store = AssociationStore::from_categories([
            ("Color", ["Red", "Blue", "Green"]),
            ("Pet", ["Cat", "Dog", "Fish"]),
            ("Drink", ["Tea", "Milk", "Water"]),
        ])
        .unwrap();
        let mut engine = PropagationEngine::with_config(
            store,
            EngineConfig {
                max_passes: Some(1),
            },
        );
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.assert_names("Blue", "Tea", Relation::Linked).unwrap();
        engine.assert_names("Dog", "Milk", Relation::Excluded).unwrap();
        engine.assert_names("Green", "Water", Relation::Excluded).unwrap();

        let stats = engine.iterate().unwrap();
        assert_eq!(stats.passes, 1);
        assert!(!stats.converged);
        assert!(!engine.store().is_solved());

        engine.iterate().unwrap();
        engine.iterate().unwrap();
        engine.iterate().unwrap();
        assert!(engine.store().is_solved());
    }

    #[test]
    fn test_zero_pass_limit_still_runs_one_pass() {
        let store =
            AssociationStore::from_categories([("Color", ["Red", "Blue"]), ("Pet", ["Cat", "Dog"])])
                .unwrap();
        let mut engine = PropagationEngine::with_config(
            store,
            EngineConfig {
                max_passes: Some(0),
            },
        );
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();

        let stats = engine.iterate().unwrap();
        assert_eq!(stats.passes, 1);
        assert_eq!(assoc(&engine, "Blue", "Dog"), Association::Linked);
        assert!(engine.store().is_solved());
    }

    #[test]
    fn test_individual_rules() {
        let mut engine = three_by_three();
        engine.assert_names("Red", "Cat", Relation::Linked).unwrap();
        engine.assert_names("Red", "Milk", Relation::Excluded).unwrap();

        let excluded = engine.exclude().unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(assoc(&engine, "Cat", "Milk"), Association::Excluded);
        assert!(engine.exclude().unwrap().is_empty());
        assert!(engine.find_solved().unwrap().is_empty());
    }
}
