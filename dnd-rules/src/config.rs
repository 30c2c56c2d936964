//! Tunable rule constants.

use serde::{Deserialize, Serialize};

/// Options shared by every resolver.
///
/// Defaults follow the 2024 rules. Missing JSON fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesOptions {
    /// Penalty subtracted from every d20 test per exhaustion level.
    pub exhaustion_penalty_per_level: i32,

    /// Highest level the standard progression tables cover.
    pub level_cap: u8,

    /// Hit die used when a class is missing from the catalog.
    pub fallback_hit_die: u8,

    /// Walking speed used when the species is missing or has none.
    pub fallback_speed: u32,
}

impl Default for RulesOptions {
    fn default() -> Self {
        Self {
            exhaustion_penalty_per_level: 2,
            level_cap: 20,
            fallback_hit_die: 8,
            fallback_speed: 30,
        }
    }
}

impl RulesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the per-level exhaustion penalty.
    pub fn with_exhaustion_penalty(mut self, per_level: i32) -> Self {
        self.exhaustion_penalty_per_level = per_level;
        self
    }

    /// Set the level cap (at least 1).
    pub fn with_level_cap(mut self, cap: u8) -> Self {
        self.level_cap = cap.max(1);
        self
    }

    pub fn with_fallback_hit_die(mut self, die: u8) -> Self {
        self.fallback_hit_die = die.max(1);
        self
    }

    pub fn with_fallback_speed(mut self, speed: u32) -> Self {
        self.fallback_speed = speed;
        self
    }

    /// Clamp a character level to `1..=level_cap`.
    pub fn clamp_level(&self, level: u32) -> u8 {
        level.clamp(1, u32::from(self.level_cap.max(1))) as u8
    }
}
