//! Catalog records: classes, subclasses, species, feats, tools and spells.
//!
//! The catalog is read-only lookup data supplied by the caller. It can be
//! loaded from JSON with this shape (every list is optional):
//!
//! ```json
//! {
//!   "classes": [{
//!     "id": "wizard", "name": "Wizard", "hit_die": 6,
//!     "saving_throws": ["int", "wis"],
//!     "prerequisite": { "rule": "all", "requirements": [{ "ability": "int", "minimum": 13 }] },
//!     "spellcasting": {
//!       "caster_type": "full", "preparation": "prepared", "spellcasting_ability": "int",
//!       "progression": { "1": { "slots": { "1": 2 }, "cantrips_known": 3, "prepared_spell_max": 4 } }
//!     }
//!   }],
//!   "subclasses": [], "species": [], "feats": [], "tools": [], "spells": [],
//!   "multiclass_warnings": []
//! }
//! ```
//!
//! Every id and spell name is matched case-insensitively through
//! [`normalize_key`].

use crate::abilities::{Ability, AbilityBonuses, Skill};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Highest spell level.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Errors from loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Invalid spell progression for '{class}' at level {level}: {reason}")]
    InvalidProgression {
        class: String,
        level: u8,
        reason: String,
    },

    #[error("Spell '{name}' has level {level}, above 9")]
    InvalidSpellLevel { name: String, level: u8 },

    #[error("Subclass '{subclass}' belongs to unknown class '{class}'")]
    UnknownParentClass { subclass: String, class: String },
}

/// Normalize an id or spell name for lookup.
///
/// Lowercases, turns runs of whitespace, `-` and `_` into a single `_`, and
/// drops other punctuation: `"Hunter's Mark"` becomes `"hunters_mark"`.
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }
    key
}

// ============================================================================
// Spellcasting profiles
// ============================================================================

/// How much a class contributes to a multiclass spellcaster level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CasterType {
    #[default]
    None,
    Full,
    Half,
    Third,
    /// Pact magic: a separate short-rest pool that never joins the
    /// multiclass slot table.
    Pact,
}

impl CasterType {
    /// Caster levels contributed by `class_level` levels in this class.
    pub fn caster_levels(&self, class_level: u8) -> u8 {
        match self {
            CasterType::Full => class_level,
            CasterType::Half => class_level / 2,
            CasterType::Third => class_level / 3,
            CasterType::Pact | CasterType::None => 0,
        }
    }

    pub fn is_pact(&self) -> bool {
        matches!(self, CasterType::Pact)
    }
}

impl fmt::Display for CasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CasterType::None => write!(f, "none"),
            CasterType::Full => write!(f, "full"),
            CasterType::Half => write!(f, "half"),
            CasterType::Third => write!(f, "third"),
            CasterType::Pact => write!(f, "pact"),
        }
    }
}

/// Whether the class prepares from its whole list or learns a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpellPreparation {
    #[default]
    Prepared,
    Known,
}

/// Pact magic pool at one class level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSlots {
    pub slot_level: u8,
    pub count: u8,
}

/// One row of a class progression table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgression {
    /// Spell level → slot count.
    #[serde(default)]
    pub slots: BTreeMap<u8, u8>,
    #[serde(default)]
    pub cantrips_known: u8,
    #[serde(default)]
    pub prepared_spell_max: Option<u8>,
    #[serde(default)]
    pub pact_slots: Option<PactSlots>,
}

/// When a class-wide spell grant becomes always prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantTrigger {
    /// As soon as the class has any spell slot.
    AnySlot,
    /// At this class level.
    Level(u8),
}

/// A spell every member of a class has always prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpellGrant {
    pub spell: String,
    pub trigger: GrantTrigger,
}

/// A spell granted by a subclass or species feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlwaysPreparedGrant {
    pub spell_name: String,
    pub granted_at_level: u8,
}

impl AlwaysPreparedGrant {
    pub fn new(spell_name: impl Into<String>, granted_at_level: u8) -> Self {
        Self {
            spell_name: spell_name.into(),
            granted_at_level,
        }
    }
}

/// Per-class spellcasting data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpellProfile {
    pub caster_type: CasterType,
    #[serde(default)]
    pub preparation: SpellPreparation,
    pub spellcasting_ability: Ability,
    /// Class level → progression row. Missing levels inherit the closest
    /// lower row.
    #[serde(default)]
    pub progression: BTreeMap<u8, LevelProgression>,
    #[serde(default)]
    pub class_grants: Vec<ClassSpellGrant>,
}

impl ClassSpellProfile {
    /// Progression row in effect at `level`.
    pub fn row(&self, level: u8) -> Option<&LevelProgression> {
        self.progression
            .range(..=level)
            .next_back()
            .map(|(_, row)| row)
    }

    fn validate(&self, class: &str) -> Result<(), CatalogError> {
        let invalid = |level: u8, reason: &str| CatalogError::InvalidProgression {
            class: class.to_string(),
            level,
            reason: reason.to_string(),
        };
        for (&level, row) in &self.progression {
            if level == 0 {
                return Err(invalid(level, "class levels start at 1"));
            }
            if row
                .slots
                .keys()
                .any(|&spell_level| spell_level == 0 || spell_level > MAX_SPELL_LEVEL)
            {
                return Err(invalid(level, "slot levels must be 1-9"));
            }
            match (self.caster_type.is_pact(), row.pact_slots) {
                (true, _) if !row.slots.is_empty() => {
                    return Err(invalid(level, "pact casters have no standard slots"));
                }
                (false, Some(_)) => {
                    return Err(invalid(level, "only pact casters have pact slots"));
                }
                (true, Some(pact)) if pact.slot_level == 0 || pact.slot_level > MAX_SPELL_LEVEL => {
                    return Err(invalid(level, "pact slot level must be 1-9"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// Multiclassing
// ============================================================================

/// How the requirement lines of a prerequisite combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrerequisiteRule {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRequirement {
    pub ability: Ability,
    pub minimum: u8,
}

impl AbilityRequirement {
    pub fn new(ability: Ability, minimum: u8) -> Self {
        Self { ability, minimum }
    }
}

/// Ability scores needed to multiclass into (or out of) a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticlassPrerequisite {
    #[serde(default)]
    pub rule: PrerequisiteRule,
    #[serde(default)]
    pub requirements: Vec<AbilityRequirement>,
}

/// Proficiencies gained when the class is taken as a secondary class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticlassGains {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub skill_choices: u8,
    #[serde(default)]
    pub skill_options: Vec<Skill>,
}

/// Advisory text for a class combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticlassWarning {
    pub classes: Vec<String>,
    pub message: String,
}

impl MulticlassWarning {
    /// True when every class in the combination is held.
    pub fn applies_to(&self, held: &[String]) -> bool {
        let held: Vec<String> = held.iter().map(|id| normalize_key(id)).collect();
        !self.classes.is_empty()
            && self
                .classes
                .iter()
                .all(|class| held.contains(&normalize_key(class)))
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    pub hit_die: u8,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub spellcasting: Option<ClassSpellProfile>,
    #[serde(default)]
    pub prerequisite: MulticlassPrerequisite,
    #[serde(default)]
    pub multiclass: MulticlassGains,
}

impl ClassRecord {
    pub fn caster_type(&self) -> CasterType {
        self.spellcasting
            .as_ref()
            .map(|profile| profile.caster_type)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassRecord {
    pub id: String,
    pub class_id: String,
    pub name: String,
    #[serde(default)]
    pub always_prepared: Vec<AlwaysPreparedGrant>,
    /// Spellcasting for subclasses of non-casting classes.
    #[serde(default)]
    pub spellcasting: Option<ClassSpellProfile>,
}

/// A numeric effect of a species trait or feat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraitEffect {
    /// `amount` extra hit points per character level.
    HitPointsPerLevel { amount: i32 },
    /// A one-time hit point bonus.
    FlatHitPoints { amount: i32 },
    /// Add the proficiency bonus to initiative.
    InitiativeProficiency,
    /// Walking speed increase.
    Speed { amount: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub speed: Option<u32>,
    /// Legacy species ability increases. Empty under the 2024 rules.
    #[serde(default)]
    pub ability_bonuses: AbilityBonuses,
    #[serde(default)]
    pub effects: Vec<TraitEffect>,
    #[serde(default)]
    pub always_prepared: Vec<AlwaysPreparedGrant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<TraitEffect>,
}

/// A tool and the skills it grants advantage on when both are proficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRecord {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
}

impl SpellRecord {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Serialized form of a [`Catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub classes: Vec<ClassRecord>,
    pub subclasses: Vec<SubclassRecord>,
    pub species: Vec<SpeciesRecord>,
    pub feats: Vec<FeatRecord>,
    pub tools: Vec<ToolRecord>,
    pub spells: Vec<SpellRecord>,
    pub multiclass_warnings: Vec<MulticlassWarning>,
}

/// Read-only lookup tables keyed by normalized id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: BTreeMap<String, ClassRecord>,
    subclasses: BTreeMap<String, SubclassRecord>,
    species: BTreeMap<String, SpeciesRecord>,
    feats: BTreeMap<String, FeatRecord>,
    tools: BTreeMap<String, ToolRecord>,
    spells: BTreeMap<String, SpellRecord>,
    warnings: Vec<MulticlassWarning>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Validate and index catalog data.
    ///
    /// Classes are added before subclasses so parent references resolve.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for class in data.classes {
            catalog.add_class(class)?;
        }
        for subclass in data.subclasses {
            catalog.add_subclass(subclass)?;
        }
        for species in data.species {
            catalog.add_species(species)?;
        }
        for feat in data.feats {
            catalog.add_feat(feat)?;
        }
        for tool in data.tools {
            catalog.add_tool(tool)?;
        }
        for spell in data.spells {
            catalog.add_spell(spell)?;
        }
        catalog.warnings = data.multiclass_warnings;
        Ok(catalog)
    }

    /// Index data that is known to be valid, skipping validation.
    pub(crate) fn from_trusted(data: CatalogData) -> Self {
        let mut catalog = Self::new();
        for class in data.classes {
            catalog.classes.insert(normalize_key(&class.id), class);
        }
        for subclass in data.subclasses {
            catalog.subclasses.insert(normalize_key(&subclass.id), subclass);
        }
        for species in data.species {
            catalog.species.insert(normalize_key(&species.id), species);
        }
        for feat in data.feats {
            catalog.feats.insert(normalize_key(&feat.id), feat);
        }
        for tool in data.tools {
            catalog.tools.insert(normalize_key(&tool.id), tool);
        }
        for spell in data.spells {
            catalog.spells.insert(normalize_key(&spell.name), spell);
        }
        catalog.warnings = data.multiclass_warnings;
        catalog
    }

    /// Export the catalog back to its serialized form.
    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            classes: self.classes.values().cloned().collect(),
            subclasses: self.subclasses.values().cloned().collect(),
            species: self.species.values().cloned().collect(),
            feats: self.feats.values().cloned().collect(),
            tools: self.tools.values().cloned().collect(),
            spells: self.spells.values().cloned().collect(),
            multiclass_warnings: self.warnings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    pub fn add_class(&mut self, class: ClassRecord) -> Result<(), CatalogError> {
        if let Some(profile) = &class.spellcasting {
            profile.validate(&class.id)?;
        }
        let id = class.id.clone();
        insert_unique(&mut self.classes, "class", &id, class)
    }

    pub fn add_subclass(&mut self, subclass: SubclassRecord) -> Result<(), CatalogError> {
        if self.class(&subclass.class_id).is_none() {
            return Err(CatalogError::UnknownParentClass {
                subclass: subclass.id,
                class: subclass.class_id,
            });
        }
        if let Some(profile) = &subclass.spellcasting {
            profile.validate(&subclass.id)?;
        }
        let id = subclass.id.clone();
        insert_unique(&mut self.subclasses, "subclass", &id, subclass)
    }

    pub fn add_species(&mut self, species: SpeciesRecord) -> Result<(), CatalogError> {
        let id = species.id.clone();
        insert_unique(&mut self.species, "species", &id, species)
    }

    pub fn add_feat(&mut self, feat: FeatRecord) -> Result<(), CatalogError> {
        let id = feat.id.clone();
        insert_unique(&mut self.feats, "feat", &id, feat)
    }

    pub fn add_tool(&mut self, tool: ToolRecord) -> Result<(), CatalogError> {
        let id = tool.id.clone();
        insert_unique(&mut self.tools, "tool", &id, tool)
    }

    pub fn add_spell(&mut self, spell: SpellRecord) -> Result<(), CatalogError> {
        if spell.level > MAX_SPELL_LEVEL {
            return Err(CatalogError::InvalidSpellLevel {
                name: spell.name,
                level: spell.level,
            });
        }
        let name = spell.name.clone();
        insert_unique(&mut self.spells, "spell", &name, spell)
    }

    pub fn add_warning(&mut self, warning: MulticlassWarning) {
        self.warnings.push(warning);
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    pub fn class(&self, id: &str) -> Option<&ClassRecord> {
        self.classes.get(&normalize_key(id))
    }

    /// All classes ordered by id.
    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    pub fn subclass(&self, id: &str) -> Option<&SubclassRecord> {
        self.subclasses.get(&normalize_key(id))
    }

    /// Subclasses belonging to `class_id`.
    pub fn subclasses_of<'a>(&'a self, class_id: &str) -> impl Iterator<Item = &'a SubclassRecord> {
        let class_key = normalize_key(class_id);
        self.subclasses
            .values()
            .filter(move |subclass| normalize_key(&subclass.class_id) == class_key)
    }

    pub fn species(&self, id: &str) -> Option<&SpeciesRecord> {
        self.species.get(&normalize_key(id))
    }

    pub fn feat(&self, id: &str) -> Option<&FeatRecord> {
        self.feats.get(&normalize_key(id))
    }

    /// Look up a tool by id, falling back to its display name.
    pub fn tool(&self, id_or_name: &str) -> Option<&ToolRecord> {
        let key = normalize_key(id_or_name);
        self.tools.get(&key).or_else(|| {
            self.tools
                .values()
                .find(|tool| normalize_key(&tool.name) == key)
        })
    }

    /// Case-insensitive spell lookup by name.
    pub fn spell(&self, name: &str) -> Option<&SpellRecord> {
        self.spells.get(&normalize_key(name))
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellRecord> {
        self.spells.values()
    }

    pub fn warnings(&self) -> &[MulticlassWarning] {
        &self.warnings
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    id: &str,
    record: T,
) -> Result<(), CatalogError> {
    let key = normalize_key(id);
    if map.contains_key(&key) {
        return Err(CatalogError::DuplicateId {
            kind,
            id: id.to_string(),
        });
    }
    map.insert(key, record);
    Ok(())
}
