//! Testing utilities for the rules engine.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedRoller` returns preset die values instead of random ones
//! - `sample_fighter` and `sample_wizard` build ready-made inputs
//! - Assertion helpers for notices

use crate::abilities::{Ability, AbilityBonuses, AbilityScores, ProficiencyLevel, Skill};
use crate::derived::{ArmorClass, ArmorType, ClassEntry, DerivedStatsInput};
use crate::diagnostics::{Notice, Resolved};
use crate::dice::DieRoller;
use std::collections::VecDeque;

/// Value returned once the script runs out.
pub const SCRIPT_EXHAUSTED_ROLL: u32 = 10;

/// A die roller that plays back scripted values in order.
///
/// Values are returned as given, so out-of-range values can be used to
/// exercise clamping.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    /// Values still to be returned.
    script: VecDeque<u32>,
    /// Number of dice thrown so far.
    rolls_made: usize,
}

impl ScriptedRoller {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
            rolls_made: 0,
        }
    }

    /// Queue more values after the current script.
    pub fn push(&mut self, value: u32) {
        self.script.push_back(value);
    }

    pub fn rolls_made(&self) -> usize {
        self.rolls_made
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DieRoller for ScriptedRoller {
    fn roll_die(&mut self, _faces: u32) -> u32 {
        self.rolls_made += 1;
        self.script.pop_front().unwrap_or(SCRIPT_EXHAUSTED_ROLL)
    }
}

/// Level 3 human fighter in chain mail with a shield.
pub fn sample_fighter() -> DerivedStatsInput {
    DerivedStatsInput::new(AbilityScores::new(15, 13, 14, 10, 12, 8))
        .with_species("human")
        .with_background_bonus(
            AbilityBonuses::new()
                .with(Ability::Strength, 2)
                .with(Ability::Constitution, 1),
        )
        .with_class(ClassEntry::new("fighter", 3).with_subclass("champion"))
        .with_skill(Skill::Athletics, ProficiencyLevel::Proficient)
        .with_skill(Skill::Perception, ProficiencyLevel::Proficient)
        .with_armor(ArmorClass::worn(ArmorType::Heavy, 16).with_shield(2))
}

/// Level 5 elf evoker.
pub fn sample_wizard() -> DerivedStatsInput {
    DerivedStatsInput::new(AbilityScores::new(8, 14, 13, 15, 12, 10))
        .with_species("elf")
        .with_background_bonus(
            AbilityBonuses::new()
                .with(Ability::Intelligence, 2)
                .with(Ability::Constitution, 1),
        )
        .with_class(ClassEntry::new("wizard", 5).with_subclass("evoker"))
        .with_skill(Skill::Arcana, ProficiencyLevel::Proficient)
        .with_skill(Skill::History, ProficiencyLevel::Expertise)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a result carries no notices.
pub fn assert_clean<T>(resolved: &Resolved<T>) {
    assert!(
        resolved.notices.is_empty(),
        "Expected no notices, got: {:?}",
        resolved.notices
    );
}

/// Assert that a result carries a specific notice.
pub fn assert_notice<T>(resolved: &Resolved<T>, notice: &Notice) {
    assert!(
        resolved.notices.contains(notice),
        "Expected notice {notice}, got: {:?}",
        resolved.notices
    );
}
