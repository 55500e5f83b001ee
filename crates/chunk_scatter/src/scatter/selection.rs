//! Weighted category selection.
//!
//! [`CategorySelector`] turns the configured category weights into a single draw with
//! `P(category) = weight / total`. Weights accumulate in configuration order; the
//! first category whose cumulative weight meets or exceeds the roll wins.
//!
//! With [`WeightShape::Percent`] the roll spans `max(100, total)`, so mass missing
//! from a table that sums below 100 selects nothing.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::scatter::config::WeightShape;
use crate::scatter::{Category, CategoryId};

const PERCENT_TOTAL: f32 = 100.0;

#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    id: CategoryId,
    cumulative: f32,
}

/// Precomputed cumulative weights over the positive-weight categories.
#[derive(Debug, Clone)]
pub struct CategorySelector {
    entries: Vec<Entry>,
    total: f32,
    span: f32,
}

impl CategorySelector {
    /// Builds a selector; fails when no category has a positive weight.
    pub fn try_new(categories: &[Category], shape: WeightShape) -> Result<Self> {
        let mut entries = Vec::with_capacity(categories.len());
        let mut total = 0.0f32;
        for (index, category) in categories.iter().enumerate() {
            if !category.weight.is_finite() || category.weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "category '{}' weight must be finite and >= 0 (got {})",
                    category.id, category.weight
                )));
            }
            if category.weight == 0.0 {
                continue;
            }
            total += category.weight;
            entries.push(Entry {
                index,
                id: category.id.clone(),
                cumulative: total,
            });
        }

        if entries.is_empty() || total <= 0.0 {
            return Err(Error::InvalidConfig(
                "category weights are all zero; distribution is undefined".into(),
            ));
        }

        let span = match shape {
            WeightShape::Raw => total,
            WeightShape::Percent => total.max(PERCENT_TOTAL),
        };

        Ok(Self {
            entries,
            total,
            span,
        })
    }

    /// Sum of positive weights.
    pub fn total_weight(&self) -> f32 {
        self.total
    }

    /// Probability that a draw selects any category.
    pub fn fill_probability(&self) -> f32 {
        self.total / self.span
    }

    /// Probability of selecting the category at `index` in the configured list.
    pub fn probability_of(&self, index: usize) -> f32 {
        let mut previous = 0.0;
        for entry in &self.entries {
            if entry.index == index {
                return (entry.cumulative - previous) / self.span;
            }
            previous = entry.cumulative;
        }
        0.0
    }

    /// Draws one category index into the configured list, or `None` for residual mass.
    pub fn pick(&self, rng: &mut dyn RngCore) -> Option<usize> {
        let roll = crate::sampling::rand01(rng) * self.span;
        self.resolve(roll)
    }

    /// Like [`CategorySelector::pick`] but returns the category id.
    pub fn pick_id(&self, rng: &mut dyn RngCore) -> Option<&CategoryId> {
        let roll = crate::sampling::rand01(rng) * self.span;
        self.resolve_entry(roll).map(|e| &e.id)
    }

    /// Maps a roll in `[0, span]` to a category index.
    ///
    /// A roll equal to the total weight resolves to the last positive category.
    pub fn resolve(&self, roll: f32) -> Option<usize> {
        self.resolve_entry(roll).map(|e| e.index)
    }

    fn resolve_entry(&self, roll: f32) -> Option<&Entry> {
        if roll > self.total {
            return None;
        }
        self.entries
            .iter()
            .find(|e| roll <= e.cumulative)
            .or_else(|| self.entries.last())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scatter::SpacingClass;

    fn cat(id: &str, weight: f32) -> Category {
        Category::new(id, weight, SpacingClass::Open)
    }

    struct FixedRng {
        value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn all_zero_weights_fail() {
        let err = CategorySelector::try_new(&[cat("a", 0.0), cat("b", 0.0)], WeightShape::Raw)
            .expect_err("zero weights must fail");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn empty_table_fails() {
        assert!(CategorySelector::try_new(&[], WeightShape::Percent).is_err());
    }

    #[test]
    fn negative_weight_fails() {
        assert!(CategorySelector::try_new(&[cat("a", -1.0), cat("b", 2.0)], WeightShape::Raw).is_err());
    }

    #[test]
    fn fixed_rolls_select_by_cumulative_weight() {
        let sel = CategorySelector::try_new(&[cat("a", 0.7), cat("b", 0.3)], WeightShape::Raw).unwrap();

        let mut rng_first = FixedRng { value: 0 };
        assert_eq!(sel.pick_id(&mut rng_first).unwrap(), "a");

        let mut rng_second = FixedRng {
            value: (0.8 * u32::MAX as f32) as u32,
        };
        assert_eq!(sel.pick_id(&mut rng_second).unwrap(), "b");
    }

    #[test]
    fn boundary_roll_is_last_category() {
        let sel = CategorySelector::try_new(&[cat("a", 1.0), cat("b", 3.0)], WeightShape::Raw).unwrap();
        assert_eq!(sel.resolve(4.0), Some(1));
        assert_eq!(sel.resolve(1.0), Some(0));
        assert_eq!(sel.resolve(0.0), Some(0));
    }

    #[test]
    fn zero_weight_categories_are_never_drawn() {
        let sel = CategorySelector::try_new(&[cat("none", 0.0), cat("b", 2.0)], WeightShape::Raw).unwrap();
        assert_eq!(sel.resolve(0.0), Some(1));
        assert_eq!(sel.probability_of(0), 0.0);
        assert_eq!(sel.probability_of(1), 1.0);
    }

    #[test]
    fn percent_residual_selects_nothing() {
        let sel = CategorySelector::try_new(&[cat("tree", 15.0), cat("rock", 5.0)], WeightShape::Percent)
            .unwrap();
        assert_eq!(sel.fill_probability(), 0.2);
        assert_eq!(sel.resolve(10.0), Some(0));
        assert_eq!(sel.resolve(19.0), Some(1));
        assert_eq!(sel.resolve(20.0), Some(1));
        assert_eq!(sel.resolve(20.5), None);
        assert_eq!(sel.resolve(99.0), None);
    }

    #[test]
    fn percent_over_hundred_is_normalized() {
        let sel = CategorySelector::try_new(&[cat("a", 90.0), cat("b", 90.0)], WeightShape::Percent)
            .unwrap();
        assert_eq!(sel.fill_probability(), 1.0);
        assert_eq!(sel.probability_of(0), 0.5);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(sel.pick(&mut rng).is_some());
        }
    }

    #[test]
    fn distribution_matches_weights() {
        let sel = CategorySelector::try_new(&[cat("a", 1.0), cat("b", 3.0)], WeightShape::Raw).unwrap();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut counts = [0usize; 2];
        for _ in 0..200_000 {
            counts[sel.pick(&mut rng).expect("raw weights always select")] += 1;
        }
        let ratio = counts[1] as f64 / counts[0] as f64;
        assert!((ratio - 3.0).abs() < 0.1, "ratio {ratio} not close to 3");
    }
}
