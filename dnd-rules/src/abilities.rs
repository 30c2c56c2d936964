//! Ability scores, modifiers, skills and proficiency levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Abilities
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    #[serde(alias = "str")]
    Strength,
    #[serde(alias = "dex")]
    Dexterity,
    #[serde(alias = "con")]
    Constitution,
    #[serde(alias = "int")]
    Intelligence,
    #[serde(alias = "wis")]
    Wisdom,
    #[serde(alias = "cha")]
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Modifier for an ability score: `floor((score - 10) / 2)`.
///
/// Floor division matters below 10: 9 and 8 are both -1, 3 is -4.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Ability scores container.
///
/// Scores are unsigned; monsters may exceed 30 so nothing clamps the upper end
/// beyond the storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(i32::from(self.get(ability)))
    }

    /// Return a copy with `bonuses` added. Results saturate at the bounds of
    /// the score type instead of wrapping.
    pub fn with_bonuses(&self, bonuses: &AbilityBonuses) -> AbilityScores {
        let mut scores = *self;
        for (ability, amount) in bonuses.iter() {
            let raised = i32::from(scores.get(ability)) + i32::from(amount);
            scores.set(ability, raised.clamp(0, i32::from(u8::MAX)) as u8);
        }
        scores
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// A set of ability score increases from one source (species or background).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityBonuses(BTreeMap<Ability, i8>);

impl AbilityBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `ability`, stacking with anything already recorded.
    pub fn with(mut self, ability: Ability, amount: i8) -> Self {
        *self.0.entry(ability).or_insert(0) += amount;
        self
    }

    pub fn get(&self, ability: Ability) -> i8 {
        self.0.get(&ability).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i8)> + '_ {
        self.0.iter().map(|(ability, amount)| (*ability, *amount))
    }

    /// True when no ability is actually changed.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|amount| *amount == 0)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    pub fn all() -> &'static [Skill] {
        &[
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Proficiency level for skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    #[default]
    None,
    Half,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    pub fn bonus(&self, proficiency_bonus: i32) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Half => proficiency_bonus.div_euclid(2),
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }

    /// Whether this counts as being proficient for rules keyed on proficiency.
    pub fn is_proficient(&self) -> bool {
        matches!(self, ProficiencyLevel::Proficient | ProficiencyLevel::Expertise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ability_modifier() {
        let scores = AbilityScores::new(16, 14, 12, 10, 8, 6);
        assert_eq!(scores.modifier(Ability::Strength), 3);
        assert_eq!(scores.modifier(Ability::Dexterity), 2);
        assert_eq!(scores.modifier(Ability::Constitution), 1);
        assert_eq!(scores.modifier(Ability::Intelligence), 0);
        assert_eq!(scores.modifier(Ability::Wisdom), -1);
        assert_eq!(scores.modifier(Ability::Charisma), -2);

        // Odd scores below 10 round toward negative infinity
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(3), -4);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn test_with_bonuses() {
        let base = AbilityScores::new(15, 14, 13, 12, 10, 8);
        let bonuses = AbilityBonuses::new()
            .with(Ability::Strength, 2)
            .with(Ability::Constitution, 1);
        let raised = base.with_bonuses(&bonuses);
        assert_eq!(raised.strength, 17);
        assert_eq!(raised.constitution, 14);
        assert_eq!(raised.charisma, 8);
    }

    #[test]
    fn test_bonuses_saturate() {
        let base = AbilityScores::new(1, 254, 10, 10, 10, 10);
        let bonuses = AbilityBonuses::new()
            .with(Ability::Strength, -3)
            .with(Ability::Dexterity, 5);
        let raised = base.with_bonuses(&bonuses);
        assert_eq!(raised.strength, 0);
        assert_eq!(raised.dexterity, 255);
    }

    #[test]
    fn test_zero_bonuses_are_empty() {
        assert!(AbilityBonuses::new().is_empty());
        assert!(AbilityBonuses::new().with(Ability::Wisdom, 0).is_empty());
        assert!(!AbilityBonuses::new().with(Ability::Wisdom, 1).is_empty());
    }

    #[test]
    fn test_bonuses_deserialize_from_abbreviations() {
        let bonuses: AbilityBonuses = serde_json::from_str(r#"{"str": 2, "con": 1}"#).unwrap();
        assert_eq!(bonuses.get(Ability::Strength), 2);
        assert_eq!(bonuses.get(Ability::Constitution), 1);
        assert_eq!(bonuses.get(Ability::Dexterity), 0);
    }

    #[test]
    fn test_proficiency_levels() {
        assert_eq!(ProficiencyLevel::None.bonus(3), 0);
        assert_eq!(ProficiencyLevel::Half.bonus(3), 1);
        assert_eq!(ProficiencyLevel::Proficient.bonus(3), 3);
        assert_eq!(ProficiencyLevel::Expertise.bonus(3), 6);
        assert!(!ProficiencyLevel::Half.is_proficient());
        assert!(ProficiencyLevel::Expertise.is_proficient());
    }

    #[test]
    fn test_skill_abilities() {
        assert_eq!(Skill::Stealth.ability(), Ability::Dexterity);
        assert_eq!(Skill::Survival.ability(), Ability::Wisdom);
        assert_eq!(Skill::Arcana.ability(), Ability::Intelligence);
        assert_eq!(Skill::all().len(), 18);
    }

    proptest! {
        #[test]
        fn modifier_matches_floor_formula(score in 0i32..=60) {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            prop_assert_eq!(ability_modifier(score), expected);
        }
    }
}
