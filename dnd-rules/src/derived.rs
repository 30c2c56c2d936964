//! Derived character statistics.
//!
//! Everything here is recomputed from scratch from a build snapshot. Missing
//! catalog entries fall back to neutral defaults and leave a [`Notice`].

use crate::abilities::{Ability, AbilityBonuses, AbilityScores, ProficiencyLevel, Skill};
use crate::catalog::{Catalog, ClassSpellProfile, SpeciesRecord, TraitEffect};
use crate::config::RulesOptions;
use crate::diagnostics::{Notice, NoticeLog, Resolved};
use crate::spellcasting::subclass_of;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Build snapshot
// ============================================================================

/// Levels taken in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub class_id: String,
    pub level: u8,
    #[serde(default)]
    pub subclass_id: Option<String>,
}

impl ClassEntry {
    pub fn new(class_id: impl Into<String>, level: u8) -> Self {
        Self {
            class_id: class_id.into(),
            level,
            subclass_id: None,
        }
    }

    pub fn with_subclass(mut self, subclass_id: impl Into<String>) -> Self {
        self.subclass_id = Some(subclass_id.into());
        self
    }
}

/// Sum of class levels.
pub fn total_level(classes: &[ClassEntry]) -> u32 {
    classes.iter().map(|entry| u32::from(entry.level)).sum()
}

/// Worn armor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorType {
    Light,
    Medium,
    Heavy,
}

/// Armor override for AC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    pub base: i32,
    pub armor_type: Option<ArmorType>,
    #[serde(default)]
    pub shield_bonus: i32,
}

impl ArmorClass {
    pub fn unarmored() -> Self {
        Self {
            base: 10,
            armor_type: None,
            shield_bonus: 0,
        }
    }

    pub fn worn(armor_type: ArmorType, base: i32) -> Self {
        Self {
            base,
            armor_type: Some(armor_type),
            shield_bonus: 0,
        }
    }

    pub fn with_shield(mut self, bonus: i32) -> Self {
        self.shield_bonus = bonus;
        self
    }

    /// AC for a given Dexterity modifier, never below 1.
    pub fn calculate(&self, dex_mod: i32) -> i32 {
        let dex_bonus = match self.armor_type {
            None | Some(ArmorType::Light) => dex_mod,
            Some(ArmorType::Medium) => dex_mod.min(2),
            Some(ArmorType::Heavy) => 0,
        };
        (self.base + dex_bonus + self.shield_bonus).max(1)
    }
}

impl Default for ArmorClass {
    fn default() -> Self {
        Self::unarmored()
    }
}

/// Everything the calculator reads about a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedStatsInput {
    pub base_scores: AbilityScores,
    /// Explicit species ability increases. When empty, the species record's
    /// own increases are used instead.
    pub species_bonus: Option<AbilityBonuses>,
    pub background_bonus: Option<AbilityBonuses>,
    /// Ordered class list; the first entry is the starting class.
    pub classes: Vec<ClassEntry>,
    /// Character level used only when `classes` is empty.
    pub level: Option<u32>,
    pub species_id: Option<String>,
    pub feats: Vec<String>,
    pub skill_proficiencies: BTreeMap<Skill, ProficiencyLevel>,
    pub armor: Option<ArmorClass>,
}

impl DerivedStatsInput {
    pub fn new(base_scores: AbilityScores) -> Self {
        Self {
            base_scores,
            ..Self::default()
        }
    }

    pub fn with_species_bonus(mut self, bonus: AbilityBonuses) -> Self {
        self.species_bonus = Some(bonus);
        self
    }

    pub fn with_background_bonus(mut self, bonus: AbilityBonuses) -> Self {
        self.background_bonus = Some(bonus);
        self
    }

    pub fn with_class(mut self, entry: ClassEntry) -> Self {
        self.classes.push(entry);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_species(mut self, species_id: impl Into<String>) -> Self {
        self.species_id = Some(species_id.into());
        self
    }

    pub fn with_feat(mut self, feat_id: impl Into<String>) -> Self {
        self.feats.push(feat_id.into());
        self
    }

    pub fn with_skill(mut self, skill: Skill, level: ProficiencyLevel) -> Self {
        self.skill_proficiencies.insert(skill, level);
        self
    }

    pub fn with_armor(mut self, armor: ArmorClass) -> Self {
        self.armor = Some(armor);
        self
    }

    /// Sum of class levels, or the explicit level for a classless snapshot.
    pub fn character_level(&self) -> u32 {
        if self.classes.is_empty() {
            self.level.unwrap_or(1).max(1)
        } else {
            total_level(&self.classes).max(1)
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Which ability increase was applied to the base scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BonusSource {
    #[default]
    None,
    Species,
    Background,
}

/// Spell DC and attack bonus of the first spellcasting class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcastingNumbers {
    pub class_id: String,
    pub ability: Ability,
    pub save_dc: i32,
    pub attack_bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub level: u32,
    pub ability_scores: AbilityScores,
    pub bonus_source: BonusSource,
    pub modifiers: BTreeMap<Ability, i32>,
    pub proficiency_bonus: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: u32,
    pub save_proficiencies: Vec<Ability>,
    pub saving_throws: BTreeMap<Ability, i32>,
    pub skills: BTreeMap<Skill, i32>,
    pub passive_perception: i32,
    pub spellcasting: Option<SpellcastingNumbers>,
}

impl DerivedStats {
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.modifiers.get(&ability).copied().unwrap_or_default()
    }

    pub fn saving_throw(&self, ability: Ability) -> i32 {
        self.saving_throws.get(&ability).copied().unwrap_or_default()
    }

    pub fn skill(&self, skill: Skill) -> i32 {
        self.skills.get(&skill).copied().unwrap_or_default()
    }
}

// ============================================================================
// Formulas
// ============================================================================

/// Proficiency bonus by character level.
///
/// `ceil(level/4) + 1` through level 20, then `ceil((level-1)/4) + 1` so the
/// progression keeps climbing. Level 0 counts as level 1.
pub fn proficiency_bonus(level: u32) -> i32 {
    let level = i32::try_from(level.max(1)).unwrap_or(i32::MAX);
    if level <= 20 {
        (level + 3) / 4 + 1
    } else {
        (level - 2) / 4 + 2
    }
}

/// Hit points from hit dice alone, using the average-roll convention.
///
/// `hit_dice` lists `(hit die, levels)` per class in class order. The very
/// first level takes the full die.
pub fn base_hit_points(hit_dice: &[(u8, u32)], con_mod: i32) -> i32 {
    let mut total: i32 = 0;
    let mut first_level_taken = false;
    for &(die, levels) in hit_dice {
        if levels == 0 {
            continue;
        }
        let die = i32::from(die);
        let average = die / 2 + 1 + con_mod;
        let mut remaining = i32::try_from(levels).unwrap_or(i32::MAX);
        if !first_level_taken {
            total = total.saturating_add(die + con_mod);
            remaining -= 1;
            first_level_taken = true;
        }
        total = total.saturating_add(remaining.saturating_mul(average));
    }
    total
}

/// Hit points plus flat trait bonuses, never below 1.
pub fn max_hit_points(
    hit_dice: &[(u8, u32)],
    con_mod: i32,
    level: u32,
    effects: &[TraitEffect],
) -> i32 {
    let level = i32::try_from(level).unwrap_or(i32::MAX);
    let bonus = effects
        .iter()
        .map(|effect| match effect {
            TraitEffect::HitPointsPerLevel { amount } => amount.saturating_mul(level),
            TraitEffect::FlatHitPoints { amount } => *amount,
            _ => 0,
        })
        .fold(0i32, i32::saturating_add);
    base_hit_points(hit_dice, con_mod)
        .saturating_add(bonus)
        .max(1)
}

/// Apply exactly one bonus source to the base scores.
///
/// Species increases win when present (explicit first, then the species
/// record); otherwise the background's. The two are never summed.
pub fn apply_ability_bonus(
    base: &AbilityScores,
    species_bonus: Option<&AbilityBonuses>,
    species: Option<&SpeciesRecord>,
    background_bonus: Option<&AbilityBonuses>,
) -> (AbilityScores, BonusSource) {
    let species_bonus = species_bonus
        .filter(|bonus| !bonus.is_empty())
        .or_else(|| {
            species
                .map(|record| &record.ability_bonuses)
                .filter(|bonus| !bonus.is_empty())
        });
    if let Some(bonus) = species_bonus {
        return (base.with_bonuses(bonus), BonusSource::Species);
    }
    match background_bonus.filter(|bonus| !bonus.is_empty()) {
        Some(bonus) => (base.with_bonuses(bonus), BonusSource::Background),
        None => (*base, BonusSource::None),
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// Compute every derived number for a build snapshot.
pub fn compute_derived_stats(
    input: &DerivedStatsInput,
    catalog: &Catalog,
    options: &RulesOptions,
) -> Resolved<DerivedStats> {
    let mut log = NoticeLog::new();

    let species = match input.species_id.as_deref() {
        Some(id) => {
            let record = catalog.species(id);
            if record.is_none() {
                log.push(Notice::UnknownSpecies { id: id.to_string() });
            }
            record
        }
        None => None,
    };

    let mut effects: Vec<TraitEffect> = species
        .map(|record| record.effects.clone())
        .unwrap_or_default();
    for feat_id in &input.feats {
        match catalog.feat(feat_id) {
            Some(feat) => effects.extend(feat.effects.iter().copied()),
            None => log.push(Notice::UnknownFeat { id: feat_id.clone() }),
        }
    }

    let (ability_scores, bonus_source) = apply_ability_bonus(
        &input.base_scores,
        input.species_bonus.as_ref(),
        species,
        input.background_bonus.as_ref(),
    );
    let modifiers: BTreeMap<Ability, i32> = Ability::all()
        .into_iter()
        .map(|ability| (ability, ability_scores.modifier(ability)))
        .collect();
    let modifier = |ability: Ability| modifiers.get(&ability).copied().unwrap_or_default();

    let level = input.character_level();
    let pb = proficiency_bonus(level);

    // Hit dice and the first spellcasting profile, class by class.
    let mut hit_dice = Vec::with_capacity(input.classes.len().max(1));
    let mut save_proficiencies = Vec::new();
    let mut spellcasting: Option<(&str, &ClassSpellProfile)> = None;
    for (index, entry) in input.classes.iter().enumerate() {
        let class = catalog.class(&entry.class_id);
        let subclass = entry
            .subclass_id
            .as_deref()
            .and_then(|id| subclass_of(catalog, &entry.class_id, id, &mut log));
        match class {
            Some(class) => {
                hit_dice.push((class.hit_die, u32::from(entry.level)));
                if index == 0 {
                    save_proficiencies = class.saving_throws.clone();
                }
            }
            None => {
                log.push(Notice::UnknownClass {
                    id: entry.class_id.clone(),
                });
                hit_dice.push((options.fallback_hit_die, u32::from(entry.level)));
            }
        }
        if spellcasting.is_none() {
            let class_level = entry.level.min(options.level_cap);
            let profile = class
                .and_then(|c| c.spellcasting.as_ref())
                .or_else(|| subclass.and_then(|s| s.spellcasting.as_ref()))
                .filter(|profile| profile.row(class_level).is_some());
            if let Some(profile) = profile {
                spellcasting = Some((entry.class_id.as_str(), profile));
            }
        }
    }
    if hit_dice.is_empty() {
        hit_dice.push((options.fallback_hit_die, level));
    }

    let con_mod = modifier(Ability::Constitution);
    let max_hit_points = max_hit_points(&hit_dice, con_mod, level, &effects);

    let dex_mod = modifier(Ability::Dexterity);
    let armor_class = input.armor.unwrap_or_default().calculate(dex_mod);

    let alert = effects
        .iter()
        .any(|effect| matches!(effect, TraitEffect::InitiativeProficiency));
    let initiative = dex_mod + if alert { pb } else { 0 };

    let speed = species
        .and_then(|record| record.speed)
        .unwrap_or(options.fallback_speed)
        + effects
            .iter()
            .map(|effect| match effect {
                TraitEffect::Speed { amount } => *amount,
                _ => 0,
            })
            .sum::<u32>();

    let saving_throws = Ability::all()
        .into_iter()
        .map(|ability| {
            let proficient = save_proficiencies.contains(&ability);
            (ability, modifier(ability) + if proficient { pb } else { 0 })
        })
        .collect();

    let skills: BTreeMap<Skill, i32> = Skill::all()
        .iter()
        .map(|&skill| {
            let proficiency = input
                .skill_proficiencies
                .get(&skill)
                .copied()
                .unwrap_or_default();
            (skill, modifier(skill.ability()) + proficiency.bonus(pb))
        })
        .collect();
    let passive_perception = 10 + skills.get(&Skill::Perception).copied().unwrap_or_default();

    let spellcasting = spellcasting.map(|(class_id, profile)| {
        let casting_mod = modifier(profile.spellcasting_ability);
        SpellcastingNumbers {
            class_id: class_id.to_string(),
            ability: profile.spellcasting_ability,
            save_dc: 8 + pb + casting_mod,
            attack_bonus: pb + casting_mod,
        }
    });

    tracing::debug!(
        level,
        max_hit_points,
        armor_class,
        initiative,
        speed,
        "derived stats computed"
    );

    log.finish(DerivedStats {
        level,
        ability_scores,
        bonus_source,
        modifiers,
        proficiency_bonus: pb,
        max_hit_points,
        armor_class,
        initiative,
        speed,
        save_proficiencies,
        saving_throws,
        skills,
        passive_perception,
        spellcasting,
    })
}
