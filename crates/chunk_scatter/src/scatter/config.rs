//! Streaming and placement configuration.
//!
//! [`StreamConfig`] carries every recognized option and is checked once by
//! [`StreamConfig::validate`] before any chunk loads.
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::jitter_grid::MAX_JITTER;
use crate::scatter::occupancy::SpacingRules;
use crate::scatter::Category;

/// Largest accepted `visible_chunks`; the window then spans 2049 x 2049 chunks.
pub const MAX_VISIBLE_CHUNKS: u32 = 1024;

/// How category weights are interpreted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeightShape {
    /// Relative weights; every considered cell draws some category.
    #[default]
    Raw,
    /// Percentages of 100; mass left below 100 means "no decoration".
    /// Sums above 100 are normalized.
    Percent,
}

/// Inclusive-exclusive range for the uniform decoration scale.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Validates the range, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::InvalidConfig("scale range must be finite".into()));
        }
        if self.min <= 0.0 {
            return Err(Error::InvalidConfig("scale range min must be > 0".into()));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "scale range min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::new(0.8, 1.2)
    }
}

/// Configuration for streaming chunks and placing decorations.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Cells per chunk side; one tile per cell, cells are one world unit.
    pub chunk_size: u32,
    /// Chebyshev radius, in chunks, of the loaded window around the viewer.
    pub visible_chunks: u32,
    /// Decoration categories in selection order.
    pub categories: Vec<Category>,
    /// Interpretation of category weights.
    pub weight_shape: WeightShape,
    /// Minimum separations between decorations.
    pub spacing: SpacingRules,
    /// Scale range for categories without their own.
    pub scale_range: ScaleRange,
    /// Base seed; each chunk derives its own seed from it.
    pub seed: u64,
    /// Maximum offset from the cell center, in cell units, in [0, 0.5].
    pub jitter: f32,
    /// Z offset of decorations above the tile plane.
    pub decoration_lift: f32,
    /// Depth hint units per world unit of height.
    pub depth_multiplier: f32,
    /// Probability in [0, 1] that a cell is considered for a decoration at all.
    pub density: f32,
    /// Upper bound on accepted decorations per chunk.
    pub max_decorations_per_chunk: Option<usize>,
    /// Content key for ground tiles.
    pub tile_prefab: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            visible_chunks: 2,
            categories: Vec::new(),
            weight_shape: WeightShape::Raw,
            spacing: SpacingRules::default(),
            scale_range: ScaleRange::default(),
            seed: 0,
            jitter: 0.4,
            decoration_lift: 0.01,
            depth_multiplier: 100.0,
            density: 1.0,
            max_decorations_per_chunk: None,
            tile_prefab: "ground".into(),
        }
    }
}

impl StreamConfig {
    /// Creates a new [`StreamConfig`] with the given chunk size and visible radius.
    pub fn new(chunk_size: u32, visible_chunks: u32) -> Self {
        Self {
            chunk_size,
            visible_chunks,
            ..Default::default()
        }
    }

    /// Appends a category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Appends several categories.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories.extend(categories);
        self
    }

    /// Sets the weight interpretation.
    pub fn with_weight_shape(mut self, shape: WeightShape) -> Self {
        self.weight_shape = shape;
        self
    }

    /// Sets the spacing rules.
    pub fn with_spacing(mut self, spacing: SpacingRules) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the default scale range.
    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.scale_range = ScaleRange::new(min, max);
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the cell jitter.
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the decoration lift.
    pub fn with_decoration_lift(mut self, lift: f32) -> Self {
        self.decoration_lift = lift;
        self
    }

    /// Sets the depth multiplier.
    pub fn with_depth_multiplier(mut self, multiplier: f32) -> Self {
        self.depth_multiplier = multiplier;
        self
    }

    /// Sets the cell density.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Caps accepted decorations per chunk.
    pub fn with_max_decorations_per_chunk(mut self, max: usize) -> Self {
        self.max_decorations_per_chunk = Some(max);
        self
    }

    /// Sets the tile prefab key.
    pub fn with_tile_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.tile_prefab = prefab.into();
        self
    }

    /// Looks up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Scale range that applies to `category`.
    pub fn scale_range_for(&self, category: &Category) -> ScaleRange {
        category.scale_range.unwrap_or(self.scale_range)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be > 0".into()));
        }
        if self.visible_chunks > MAX_VISIBLE_CHUNKS {
            return Err(Error::InvalidConfig(format!(
                "visible_chunks must be <= {MAX_VISIBLE_CHUNKS} (got {})",
                self.visible_chunks
            )));
        }
        if self.tile_prefab.is_empty() {
            return Err(Error::InvalidConfig("tile_prefab must not be empty".into()));
        }
        if self.categories.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one category must be configured".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.categories.len());
        for category in &self.categories {
            if category.id.is_empty() {
                return Err(Error::InvalidConfig("category id must not be empty".into()));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate category '{}'",
                    category.id
                )));
            }
            if !category.weight.is_finite() || category.weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "category '{}' weight must be finite and >= 0 (got {})",
                    category.id, category.weight
                )));
            }
            if category.weight > 0.0 && category.prefab.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "category '{}' has no prefab",
                    category.id
                )));
            }
            if let Some(range) = category.scale_range {
                range.validate().map_err(|e| {
                    Error::InvalidConfig(format!("category '{}': {}", category.id, e))
                })?;
            }
        }
        if !self.categories.iter().any(|c| c.weight > 0.0) {
            return Err(Error::InvalidConfig(
                "at least one category must have a positive weight".into(),
            ));
        }

        self.spacing.validate()?;
        self.scale_range.validate()?;

        if !self.jitter.is_finite() || !(0.0..=MAX_JITTER).contains(&self.jitter) {
            return Err(Error::InvalidConfig(format!(
                "jitter must be in [0, {MAX_JITTER}] (got {})",
                self.jitter
            )));
        }
        if !self.decoration_lift.is_finite() {
            return Err(Error::InvalidConfig("decoration_lift must be finite".into()));
        }
        if !self.depth_multiplier.is_finite() || self.depth_multiplier <= 0.0 {
            return Err(Error::InvalidConfig("depth_multiplier must be > 0".into()));
        }
        if !self.density.is_finite() || !(0.0..=1.0).contains(&self.density) {
            return Err(Error::InvalidConfig(format!(
                "density must be in [0, 1] (got {})",
                self.density
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::SpacingClass;

    fn valid() -> StreamConfig {
        StreamConfig::new(10, 1).with_categories([Category::tree(60.0), Category::rock(40.0)])
    }

    fn message(config: &StreamConfig) -> String {
        match config.validate() {
            Err(Error::InvalidConfig(msg)) => msg,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn defaults_with_categories_validate() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let config = StreamConfig {
            chunk_size: 0,
            ..valid()
        };
        assert!(message(&config).contains("chunk_size"));
    }

    #[test]
    fn rejects_oversized_window() {
        let config = StreamConfig {
            visible_chunks: u32::MAX,
            ..valid()
        };
        assert!(message(&config).contains("visible_chunks"));

        let widest = StreamConfig {
            visible_chunks: MAX_VISIBLE_CHUNKS,
            ..valid()
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn defaults_consider_every_cell_without_cap() {
        let config = StreamConfig::default();
        assert_eq!(config.density, 1.0);
        assert_eq!(config.max_decorations_per_chunk, None);
        assert_eq!(config.jitter, 0.4);
        assert_eq!(config.depth_multiplier, 100.0);
    }

    #[test]
    fn rejects_missing_or_all_zero_categories() {
        assert!(message(&StreamConfig::new(10, 1)).contains("category"));

        let zeros = StreamConfig::new(10, 1).with_categories([
            Category::new("a", 0.0, SpacingClass::Open),
            Category::new("b", 0.0, SpacingClass::Open),
        ]);
        assert!(message(&zeros).contains("positive weight"));
    }

    #[test]
    fn rejects_negative_and_nan_weights() {
        let negative = valid().with_category(Category::lake(-1.0));
        assert!(message(&negative).contains("lake"));

        let nan = StreamConfig::new(4, 0).with_category(Category::tree(f32::NAN));
        assert!(message(&nan).contains("tree"));
    }

    #[test]
    fn rejects_duplicate_ids_and_missing_prefab() {
        let dup = valid().with_category(Category::tree(1.0));
        assert!(message(&dup).contains("duplicate"));

        let no_prefab = StreamConfig::new(10, 0).with_category(Category::tree(1.0).with_prefab(""));
        assert!(message(&no_prefab).contains("prefab"));
    }

    #[test]
    fn zero_weight_category_may_omit_prefab() {
        let config = valid().with_category(Category::lake(0.0).with_prefab(""));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_scale_ranges() {
        assert!(message(&valid().with_scale_range(1.5, 0.5)).contains("exceeds"));

        let per_category =
            StreamConfig::new(10, 0).with_category(Category::tree(1.0).with_scale_range(2.0, 1.0));
        assert!(message(&per_category).contains("tree"));
    }

    #[test]
    fn rejects_negative_spacing() {
        let config = valid().with_spacing(SpacingRules::new(-1.0, 2.0, 3.0));
        assert!(message(&config).contains("general"));
    }

    #[test]
    fn rejects_out_of_range_knobs() {
        assert!(message(&valid().with_jitter(0.7)).contains("jitter"));
        assert!(message(&valid().with_density(1.5)).contains("density"));
        assert!(message(&valid().with_depth_multiplier(0.0)).contains("depth_multiplier"));
        assert!(message(&valid().with_tile_prefab("")).contains("tile_prefab"));
    }

    #[test]
    fn category_scale_range_overrides_default() {
        let config = valid().with_scale_range(1.0, 2.0);
        let tree = Category::tree(1.0).with_scale_range(0.5, 0.6);
        assert_eq!(config.scale_range_for(&tree), ScaleRange::new(0.5, 0.6));
        assert_eq!(
            config.scale_range_for(&Category::rock(1.0)),
            ScaleRange::new(1.0, 2.0)
        );
        assert!(config.category("rock").is_some());
        assert!(config.category("lake").is_none());
    }
}
