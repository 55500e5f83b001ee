//! Minimum-distance rejection over a chunk's placed decorations.
//!
//! The index is a linear scan over the chunk's [`DecorationRecord`]s. Placement only
//! happens when a chunk is created and a chunk holds a bounded number of cells, so no
//! spatial acceleration structure is kept.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scatter::{DecorationRecord, SpacingClass};

/// Minimum separations between decorations, in world units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacingRules {
    /// Separation used by solid and open categories.
    pub general: f32,
    /// Separation a water candidate keeps from non-solid decorations.
    pub water_like: f32,
    /// Separation between water and solid decorations, in either direction.
    pub water_to_solid: f32,
}

impl SpacingRules {
    pub const fn new(general: f32, water_like: f32, water_to_solid: f32) -> Self {
        Self {
            general,
            water_like,
            water_to_solid,
        }
    }

    /// Same separation for every pair.
    pub const fn uniform(distance: f32) -> Self {
        Self::new(distance, distance, distance)
    }

    /// Minimum distance a candidate of class `candidate` must keep from an existing
    /// decoration of class `existing`.
    pub fn min_separation(&self, candidate: SpacingClass, existing: SpacingClass) -> f32 {
        use SpacingClass::*;
        match (candidate, existing) {
            (Water, Solid) | (Solid, Water) => self.water_to_solid,
            (Water, _) => self.water_like,
            _ => self.general,
        }
    }

    /// Validates the rules, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("general", self.general),
            ("water_like", self.water_like),
            ("water_to_solid", self.water_to_solid),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "spacing.{name} must be finite and >= 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SpacingRules {
    fn default() -> Self {
        Self::new(1.5, 3.0, 4.0)
    }
}

/// Read-only spacing query over already placed records.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyIndex<'a> {
    records: &'a [DecorationRecord],
    rules: &'a SpacingRules,
}

impl<'a> OccupancyIndex<'a> {
    pub fn new(records: &'a [DecorationRecord], rules: &'a SpacingRules) -> Self {
        Self { records, rules }
    }

    /// Whether a candidate at `position` (XY plane) violates any spacing rule.
    pub fn is_too_close(&self, position: Vec2, class: SpacingClass) -> bool {
        self.records.iter().any(|existing| {
            let min = self.rules.min_separation(class, existing.class);
            min > 0.0 && existing.position.truncate().distance_squared(position) < min * min
        })
    }

    /// The first record, in placement order, closer than its required separation.
    pub fn first_conflict(&self, position: Vec2, class: SpacingClass) -> Option<&'a DecorationRecord> {
        self.records.iter().find(|existing| {
            let min = self.rules.min_separation(class, existing.class);
            min > 0.0 && existing.position.truncate().distance_squared(position) < min * min
        })
    }

    /// Number of records of `category`.
    pub fn count_of(&self, category: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
