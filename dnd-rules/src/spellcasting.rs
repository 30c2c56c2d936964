//! Spellcasting resources, always-prepared spells and selection limits.

use crate::abilities::Ability;
use crate::catalog::{
    normalize_key, AlwaysPreparedGrant, CasterType, Catalog, ClassSpellProfile, GrantTrigger,
    PactSlots, SpellRecord, SubclassRecord,
};
use crate::config::RulesOptions;
use crate::derived::ClassEntry;
use crate::diagnostics::{GrantSource, Notice, NoticeLog, Resolved};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Resources
// ============================================================================

/// Slots, cantrips and the prepared cap for one class at one level.
///
/// Pact magic lives in `pact_slots` only; a pact caster's `slots_by_level`
/// is always empty and a standard caster never has `pact_slots`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcastingResources {
    pub class_id: String,
    pub caster_type: CasterType,
    pub spellcasting_ability: Option<Ability>,
    pub slots_by_level: BTreeMap<u8, u8>,
    pub cantrips_known: u8,
    /// `None` means no prepared-spell cap (and, for a non-caster, no
    /// spellcasting at all).
    pub prepared_spell_max: Option<u8>,
    pub pact_slots: Option<PactSlots>,
}

impl SpellcastingResources {
    /// Resources of a class with no spellcasting.
    pub fn none(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            ..Self::default()
        }
    }

    /// True when any standard or pact slot exists.
    pub fn has_slots(&self) -> bool {
        self.slots_by_level.values().any(|&count| count > 0)
            || self.pact_slots.is_some_and(|pact| pact.count > 0)
    }

    pub fn has_spellcasting(&self) -> bool {
        self.has_slots() || self.cantrips_known > 0 || self.prepared_spell_max.is_some()
    }

    /// Highest spell level that can be cast, 0 with no slots.
    ///
    /// For pact casters this is the pact slot level.
    pub fn max_spell_level(&self) -> u8 {
        if let Some(pact) = self.pact_slots.filter(|pact| pact.count > 0) {
            return pact.slot_level;
        }
        self.slots_by_level
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&level, _)| level)
            .max()
            .unwrap_or(0)
    }
}

/// Look up a subclass chosen for `class_id`.
///
/// A missing subclass, or one whose parent is another class, is ignored
/// with a notice.
pub(crate) fn subclass_of<'a>(
    catalog: &'a Catalog,
    class_id: &str,
    subclass_id: &str,
    log: &mut NoticeLog,
) -> Option<&'a SubclassRecord> {
    let Some(record) = catalog.subclass(subclass_id) else {
        log.push(Notice::UnknownSubclass {
            id: subclass_id.to_string(),
        });
        return None;
    };
    if normalize_key(&record.class_id) != normalize_key(class_id) {
        log.push(Notice::SubclassMismatch {
            subclass: subclass_id.to_string(),
            class: class_id.to_string(),
        });
        return None;
    }
    Some(record)
}

/// The profile a class entry casts with: the class's own, else the
/// subclass's.
fn casting_profile<'a>(
    catalog: &'a Catalog,
    class_id: &str,
    subclass_id: Option<&str>,
    log: &mut NoticeLog,
) -> Option<&'a ClassSpellProfile> {
    let Some(class) = catalog.class(class_id) else {
        log.push(Notice::UnknownClass {
            id: class_id.to_string(),
        });
        return None;
    };
    let subclass = subclass_id.and_then(|id| subclass_of(catalog, class_id, id, log));
    class
        .spellcasting
        .as_ref()
        .or_else(|| subclass.and_then(|s| s.spellcasting.as_ref()))
}

/// Resolve slots, cantrips known and the prepared cap at a class level.
///
/// Levels above the cap use the cap's row. Level 0 or an unknown class gives
/// the empty profile with a notice; a level before the class's first
/// progression row gives the empty profile silently.
pub fn resolve_spellcasting(
    catalog: &Catalog,
    class_id: &str,
    subclass_id: Option<&str>,
    level: u8,
    options: &RulesOptions,
) -> Resolved<SpellcastingResources> {
    let mut log = NoticeLog::new();
    if level == 0 {
        log.push(Notice::MissingProgression {
            class: class_id.to_string(),
            level,
        });
        return log.finish(SpellcastingResources::none(class_id));
    }

    let Some(profile) = casting_profile(catalog, class_id, subclass_id, &mut log) else {
        return log.finish(SpellcastingResources::none(class_id));
    };

    let level = options.clamp_level(u32::from(level));
    let mut resources = SpellcastingResources {
        class_id: class_id.to_string(),
        caster_type: profile.caster_type,
        spellcasting_ability: Some(profile.spellcasting_ability),
        ..SpellcastingResources::default()
    };
    if let Some(row) = profile.row(level) {
        resources.cantrips_known = row.cantrips_known;
        resources.prepared_spell_max = row.prepared_spell_max;
        if profile.caster_type.is_pact() {
            resources.pact_slots = row.pact_slots;
        } else {
            resources.slots_by_level = row
                .slots
                .iter()
                .filter(|(_, &count)| count > 0)
                .map(|(&spell_level, &count)| (spell_level, count))
                .collect();
        }
    }

    tracing::debug!(
        class = class_id,
        level,
        max_spell_level = resources.max_spell_level(),
        "spellcasting resolved"
    );
    log.finish(resources)
}

/// Combined spellcaster level for multiclass slot tables.
///
/// Full casters add their level, half and third casters a rounded-down
/// fraction, pact casters nothing.
pub fn combined_caster_level(catalog: &Catalog, classes: &[ClassEntry]) -> Resolved<u8> {
    let mut log = NoticeLog::new();
    let total: u32 = classes
        .iter()
        .map(|entry| {
            let caster_type = casting_profile(
                catalog,
                &entry.class_id,
                entry.subclass_id.as_deref(),
                &mut log,
            )
            .map(|profile| profile.caster_type)
            .unwrap_or_default();
            u32::from(caster_type.caster_levels(entry.level))
        })
        .sum();
    log.finish(total.min(u32::from(u8::MAX)) as u8)
}

// ============================================================================
// Always prepared
// ============================================================================

/// Inputs for always-prepared resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlwaysPreparedQuery {
    pub class_id: Option<String>,
    pub subclass_id: Option<String>,
    pub species_id: Option<String>,
    /// Level in `class_id`; gates class and subclass grants.
    pub class_level: u8,
    /// Total character level; gates species grants. 0 means `class_level`.
    pub character_level: u8,
}

impl AlwaysPreparedQuery {
    pub fn class(class_id: impl Into<String>, class_level: u8) -> Self {
        Self {
            class_id: Some(class_id.into()),
            class_level,
            ..Self::default()
        }
    }

    pub fn with_subclass(mut self, subclass_id: impl Into<String>) -> Self {
        self.subclass_id = Some(subclass_id.into());
        self
    }

    pub fn with_species(mut self, species_id: impl Into<String>) -> Self {
        self.species_id = Some(species_id.into());
        self
    }

    pub fn with_character_level(mut self, level: u8) -> Self {
        self.character_level = level;
        self
    }

    fn effective_character_level(&self) -> u8 {
        if self.character_level == 0 {
            self.class_level
        } else {
            self.character_level
        }
    }
}

/// One always-prepared spell and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedGrant {
    pub spell: SpellRecord,
    pub source: GrantSource,
}

/// The always-prepared set, keyed by normalized spell name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlwaysPrepared {
    grants: BTreeMap<String, PreparedGrant>,
}

impl AlwaysPrepared {
    pub fn contains(&self, spell_name: &str) -> bool {
        self.grants.contains_key(&normalize_key(spell_name))
    }

    pub fn get(&self, spell_name: &str) -> Option<&PreparedGrant> {
        self.grants.get(&normalize_key(spell_name))
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedGrant> {
        self.grants.values()
    }

    /// Spell names in a stable order.
    pub fn names(&self) -> Vec<&str> {
        self.grants.values().map(|g| g.spell.name.as_str()).collect()
    }

    // The first source to grant a spell is the one reported.
    fn insert(&mut self, spell: &SpellRecord, source: GrantSource) {
        self.grants
            .entry(normalize_key(&spell.name))
            .or_insert_with(|| PreparedGrant {
                spell: spell.clone(),
                source,
            });
    }
}

fn grant_by_name(
    catalog: &Catalog,
    name: &str,
    source: GrantSource,
    set: &mut AlwaysPrepared,
    log: &mut NoticeLog,
) {
    match catalog.spell(name) {
        Some(spell) => set.insert(spell, source),
        None => log.push(Notice::UnresolvedSpell {
            name: name.to_string(),
            source,
        }),
    }
}

fn grant_levelled(
    catalog: &Catalog,
    grants: &[AlwaysPreparedGrant],
    level: u8,
    source: GrantSource,
    set: &mut AlwaysPrepared,
    log: &mut NoticeLog,
) {
    for grant in grants.iter().filter(|g| g.granted_at_level <= level) {
        grant_by_name(catalog, &grant.spell_name, source, set, log);
    }
}

/// Resolve every spell granted as always prepared.
///
/// Unions the class's fixed grants, the subclass's and the species'
/// level-gated grants. Names missing from the spell catalog are dropped and
/// reported as notices.
pub fn always_prepared_spells(
    catalog: &Catalog,
    query: &AlwaysPreparedQuery,
    options: &RulesOptions,
) -> Resolved<AlwaysPrepared> {
    let mut log = NoticeLog::new();
    let mut set = AlwaysPrepared::default();

    if let Some(class_id) = query.class_id.as_deref() {
        let resources = log.absorb(resolve_spellcasting(
            catalog,
            class_id,
            query.subclass_id.as_deref(),
            query.class_level,
            options,
        ));
        let class_grants = catalog
            .class(class_id)
            .and_then(|class| class.spellcasting.as_ref())
            .map(|profile| profile.class_grants.as_slice())
            .unwrap_or_default();
        for grant in class_grants {
            let granted = match grant.trigger {
                GrantTrigger::AnySlot => resources.has_slots(),
                GrantTrigger::Level(level) => query.class_level >= level,
            };
            if granted {
                grant_by_name(catalog, &grant.spell, GrantSource::Class, &mut set, &mut log);
            }
        }

        let subclass = query
            .subclass_id
            .as_deref()
            .and_then(|id| subclass_of(catalog, class_id, id, &mut log));
        if let Some(subclass) = subclass {
            grant_levelled(
                catalog,
                &subclass.always_prepared,
                query.class_level,
                GrantSource::Subclass,
                &mut set,
                &mut log,
            );
        }
    }

    if let Some(species_id) = query.species_id.as_deref() {
        match catalog.species(species_id) {
            Some(species) => grant_levelled(
                catalog,
                &species.always_prepared,
                query.effective_character_level(),
                GrantSource::Species,
                &mut set,
                &mut log,
            ),
            None => log.push(Notice::UnknownSpecies {
                id: species_id.to_string(),
            }),
        }
    }

    log.finish(set)
}

// ============================================================================
// Selection
// ============================================================================

/// Why a spell selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{class} has no spellcasting at this level")]
    NoSpellcasting { class: String },

    #[error("'{name}' is not in the spell catalog")]
    UnknownSpell { name: String },

    #[error("{spell} is already selected")]
    AlreadySelected { spell: String },

    #[error("{spell} is always prepared and does not need to be selected")]
    AlwaysPrepared { spell: String },

    #[error("Cantrip limit reached ({limit} known)")]
    CantripLimit { limit: u8 },

    #[error("Prepared spell limit reached ({limit})")]
    PreparedLimit { limit: u8 },

    #[error("{spell} is level {level}, but the highest available slot is level {max}")]
    SpellLevelTooHigh { spell: String, level: u8, max: u8 },
}

/// Everything a selection is checked against.
#[derive(Debug, Clone, Copy)]
pub struct SelectionLimits<'a> {
    pub catalog: &'a Catalog,
    pub resources: &'a SpellcastingResources,
    pub always_prepared: &'a AlwaysPrepared,
}

/// Player-chosen cantrips and leveled spells for one class.
///
/// Every mutation either succeeds completely or leaves the selection as it
/// was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSelection {
    cantrips: Vec<String>,
    spells: Vec<String>,
}

impl SpellSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cantrips(&self) -> &[String] {
        &self.cantrips
    }

    pub fn spells(&self) -> &[String] {
        &self.spells
    }

    pub fn is_selected(&self, name: &str) -> bool {
        let key = normalize_key(name);
        self.cantrips
            .iter()
            .chain(self.spells.iter())
            .any(|selected| normalize_key(selected) == key)
    }

    /// Selected leveled spells that count against the prepared cap.
    pub fn counted_spells(&self, always_prepared: &AlwaysPrepared) -> usize {
        self.spells
            .iter()
            .filter(|name| !always_prepared.contains(name))
            .count()
    }

    /// Selected cantrips that count against cantrips known.
    pub fn counted_cantrips(&self, always_prepared: &AlwaysPrepared) -> usize {
        self.cantrips
            .iter()
            .filter(|name| !always_prepared.contains(name))
            .count()
    }

    /// Add one spell.
    pub fn select(
        &mut self,
        name: &str,
        limits: &SelectionLimits<'_>,
    ) -> Result<(), SelectionError> {
        let spell = self.check_addition(name, limits)?;
        if spell.is_cantrip() {
            self.cantrips.push(spell.name.clone());
        } else {
            self.spells.push(spell.name.clone());
        }
        Ok(())
    }

    /// Add several spells atomically: all are added or none are.
    pub fn select_all<'n>(
        &mut self,
        names: impl IntoIterator<Item = &'n str>,
        limits: &SelectionLimits<'_>,
    ) -> Result<(), SelectionError> {
        let mut staged = self.clone();
        for name in names {
            staged.select(name, limits)?;
        }
        *self = staged;
        Ok(())
    }

    /// Remove a spell. Returns whether it was selected.
    pub fn deselect(&mut self, name: &str) -> bool {
        let key = normalize_key(name);
        let before = self.cantrips.len() + self.spells.len();
        self.cantrips.retain(|selected| normalize_key(selected) != key);
        self.spells.retain(|selected| normalize_key(selected) != key);
        before != self.cantrips.len() + self.spells.len()
    }

    /// Re-check the whole selection, e.g. after the character lost a level.
    pub fn validate(&self, limits: &SelectionLimits<'_>) -> Result<(), SelectionError> {
        let resources = limits.resources;
        if !resources.has_spellcasting() && !(self.cantrips.is_empty() && self.spells.is_empty()) {
            return Err(SelectionError::NoSpellcasting {
                class: resources.class_id.clone(),
            });
        }
        let max_level = resources.max_spell_level();
        for name in &self.spells {
            let spell = limits
                .catalog
                .spell(name)
                .ok_or_else(|| SelectionError::UnknownSpell { name: name.clone() })?;
            if spell.level > max_level {
                return Err(SelectionError::SpellLevelTooHigh {
                    spell: spell.name.clone(),
                    level: spell.level,
                    max: max_level,
                });
            }
        }
        if self.counted_cantrips(limits.always_prepared) > usize::from(resources.cantrips_known) {
            return Err(SelectionError::CantripLimit {
                limit: resources.cantrips_known,
            });
        }
        if let Some(limit) = resources.prepared_spell_max {
            if self.counted_spells(limits.always_prepared) > usize::from(limit) {
                return Err(SelectionError::PreparedLimit { limit });
            }
        }
        Ok(())
    }

    fn check_addition<'c>(
        &self,
        name: &str,
        limits: &SelectionLimits<'c>,
    ) -> Result<&'c SpellRecord, SelectionError> {
        let resources = limits.resources;
        if !resources.has_spellcasting() {
            return Err(SelectionError::NoSpellcasting {
                class: resources.class_id.clone(),
            });
        }
        let spell = limits
            .catalog
            .spell(name)
            .ok_or_else(|| SelectionError::UnknownSpell {
                name: name.to_string(),
            })?;
        if self.is_selected(&spell.name) {
            return Err(SelectionError::AlreadySelected {
                spell: spell.name.clone(),
            });
        }
        if limits.always_prepared.contains(&spell.name) {
            return Err(SelectionError::AlwaysPrepared {
                spell: spell.name.clone(),
            });
        }

        if spell.is_cantrip() {
            let limit = resources.cantrips_known;
            if self.counted_cantrips(limits.always_prepared) >= usize::from(limit) {
                return Err(SelectionError::CantripLimit { limit });
            }
            return Ok(spell);
        }

        let max = resources.max_spell_level();
        if spell.level > max {
            return Err(SelectionError::SpellLevelTooHigh {
                spell: spell.name.clone(),
                level: spell.level,
                max,
            });
        }
        if let Some(limit) = resources.prepared_spell_max {
            if self.counted_spells(limits.always_prepared) >= usize::from(limit) {
                return Err(SelectionError::PreparedLimit { limit });
            }
        }
        Ok(spell)
    }
}
