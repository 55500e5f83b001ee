//! Chunk streaming and decoration placement around a moving viewer.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod chunk;
pub mod config;
pub mod events;
pub mod factory;
pub mod occupancy;
pub mod planner;
pub mod selection;
pub mod stream;
pub mod viewer;

pub type CategoryId = String;

/// Spacing behavior of a category, consulted by [`occupancy::OccupancyIndex`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpacingClass {
    /// Blocks water placements (trees, rocks).
    Solid,
    /// Water-like; keeps a larger distance from solids.
    Water,
    /// Uses the general spacing only.
    #[default]
    Open,
}

impl SpacingClass {
    /// Sort offset used when a category does not set one.
    pub fn default_sort_offset(self) -> i32 {
        match self {
            SpacingClass::Water => 0,
            SpacingClass::Solid | SpacingClass::Open => 1,
        }
    }
}

/// A decoration category with its selection weight and placement rules.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Content key handed to the instance factory.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefab: String,
    /// Raw weight or percentage, depending on [`config::WeightShape`].
    pub weight: f32,
    /// Spacing class.
    #[cfg_attr(feature = "serde", serde(default))]
    pub class: SpacingClass,
    /// Added to the depth hint so that categories layer consistently at equal height.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_offset: i32,
    /// Per-category scale range, overriding [`config::StreamConfig::scale_range`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale_range: Option<config::ScaleRange>,
}

impl Category {
    /// Create a category whose prefab key equals its id.
    pub fn new(id: impl Into<CategoryId>, weight: f32, class: SpacingClass) -> Self {
        let id = id.into();
        Self {
            prefab: id.clone(),
            id,
            weight,
            class,
            sort_offset: class.default_sort_offset(),
            scale_range: None,
        }
    }

    /// A solid `tree` category drawn in front of rocks and lakes.
    pub fn tree(weight: f32) -> Self {
        Self::new("tree", weight, SpacingClass::Solid).with_sort_offset(2)
    }

    /// A solid `rock` category drawn in front of lakes.
    pub fn rock(weight: f32) -> Self {
        Self::new("rock", weight, SpacingClass::Solid).with_sort_offset(1)
    }

    /// A water-like `lake` category drawn behind everything else.
    pub fn lake(weight: f32) -> Self {
        Self::new("lake", weight, SpacingClass::Water).with_sort_offset(0)
    }

    /// Sets the prefab key.
    pub fn with_prefab(mut self, prefab: impl Into<String>) -> Self {
        self.prefab = prefab.into();
        self
    }

    /// Sets the sort offset.
    pub fn with_sort_offset(mut self, sort_offset: i32) -> Self {
        self.sort_offset = sort_offset;
        self
    }

    /// Sets a per-category scale range.
    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.scale_range = Some(config::ScaleRange::new(min, max));
        self
    }
}

/// An accepted placement. Never mutated once created, and kept while the chunk is
/// unloaded so a reload reproduces the same layout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationRecord {
    /// World position; z is the lift off the ground plane.
    pub position: Vec3,
    /// Category this record was drawn as.
    pub category: CategoryId,
    /// Spacing class of the category at placement time.
    pub class: SpacingClass,
    /// Uniform scale rolled at placement time.
    pub scale: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_id_as_prefab_and_class_offset() {
        let c = Category::new("flower", 3.0, SpacingClass::Open);
        assert_eq!(c.prefab, "flower");
        assert_eq!(c.sort_offset, 1);
        assert!(c.scale_range.is_none());
    }

    #[test]
    fn presets_layer_lake_rock_tree() {
        let (lake, rock, tree) = (Category::lake(1.0), Category::rock(1.0), Category::tree(1.0));
        assert!(lake.sort_offset < rock.sort_offset);
        assert!(rock.sort_offset < tree.sort_offset);
        assert_eq!(lake.class, SpacingClass::Water);
        assert_eq!(tree.class, SpacingClass::Solid);
    }

    #[test]
    fn builders_override_fields() {
        let c = Category::tree(5.0)
            .with_prefab("pine")
            .with_sort_offset(7)
            .with_scale_range(0.5, 1.5);
        assert_eq!(c.prefab, "pine");
        assert_eq!(c.sort_offset, 7);
        assert_eq!(c.scale_range, Some(config::ScaleRange::new(0.5, 1.5)));
    }
}
