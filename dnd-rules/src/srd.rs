//! Built-in catalog with the 2024 SRD classes, a few subclasses, species,
//! feats, tools and the spells they reference.
//!
//! Callers with their own content load a [`Catalog`] from JSON instead.

use crate::abilities::{Ability, AbilityBonuses, Skill};
use crate::catalog::{
    AbilityRequirement, AlwaysPreparedGrant, Catalog, CatalogData, CasterType, ClassRecord,
    ClassSpellGrant, ClassSpellProfile, FeatRecord, GrantTrigger, LevelProgression,
    MulticlassGains, MulticlassPrerequisite, MulticlassWarning, PactSlots, PrerequisiteRule,
    SpeciesRecord, SpellPreparation, SpellRecord, SubclassRecord, ToolRecord, TraitEffect,
};
use std::collections::BTreeMap;

lazy_static::lazy_static! {
    /// The SRD catalog, built on first use.
    static ref SRD_CATALOG: Catalog = Catalog::from_trusted(srd_data());
}

/// The shared built-in catalog.
pub fn srd() -> &'static Catalog {
    &SRD_CATALOG
}

// ============================================================================
// Progression tables (index 0 = class level 1)
// ============================================================================

const FULL_CASTER_SLOTS: [&[u8]; 20] = [
    &[2],
    &[3],
    &[4, 2],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 2],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 2],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 2, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 1, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 1, 1, 1],
    &[4, 3, 3, 3, 3, 2, 2, 1, 1],
];

// Paladins and rangers cast from level 1 under the 2024 rules.
const HALF_CASTER_SLOTS: [&[u8]; 20] = [
    &[2],
    &[2],
    &[3],
    &[3],
    &[4, 2],
    &[4, 2],
    &[4, 3],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 1],
    &[4, 3, 3, 2],
    &[4, 3, 3, 2],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 1],
    &[4, 3, 3, 3, 2],
    &[4, 3, 3, 3, 2],
];

const THIRD_CASTER_SLOTS: [&[u8]; 20] = [
    &[],
    &[],
    &[2],
    &[3],
    &[3],
    &[3],
    &[4, 2],
    &[4, 2],
    &[4, 2],
    &[4, 3],
    &[4, 3],
    &[4, 3],
    &[4, 3, 2],
    &[4, 3, 2],
    &[4, 3, 2],
    &[4, 3, 3],
    &[4, 3, 3],
    &[4, 3, 3],
    &[4, 3, 3, 1],
    &[4, 3, 3, 1],
];

/// Pact magic `(count, slot level)` per warlock level.
const PACT_MAGIC: [(u8, u8); 20] = [
    (1, 1),
    (2, 1),
    (2, 2),
    (2, 2),
    (2, 3),
    (2, 3),
    (2, 4),
    (2, 4),
    (2, 5),
    (2, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (3, 5),
    (4, 5),
    (4, 5),
    (4, 5),
    (4, 5),
];

const PREPARED_BARD_CLERIC_DRUID: [u8; 20] = [
    4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 17, 18, 18, 19, 20, 21, 22,
];
const PREPARED_SORCERER: [u8; 20] = [
    2, 4, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 17, 18, 18, 19, 20, 21, 22,
];
const PREPARED_WIZARD: [u8; 20] = [
    4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 16, 17, 18, 19, 21, 22, 23, 24, 25,
];
const PREPARED_WARLOCK: [u8; 20] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15,
];
const PREPARED_HALF_CASTER: [u8; 20] = [
    2, 3, 4, 5, 6, 6, 7, 7, 9, 9, 10, 10, 11, 11, 12, 12, 14, 14, 15, 15,
];
/// Eldritch Knight, starting at fighter level 3.
const PREPARED_ELDRITCH_KNIGHT: [u8; 18] = [
    3, 4, 4, 4, 5, 6, 6, 7, 8, 8, 9, 10, 10, 11, 11, 11, 12, 13,
];

/// Cantrips known at class levels 1-3, 4-9 and 10+.
fn cantrips_at(level: u8, tiers: [u8; 3]) -> u8 {
    match level {
        0..=3 => tiers[0],
        4..=9 => tiers[1],
        _ => tiers[2],
    }
}

fn slot_map(counts: &[u8]) -> BTreeMap<u8, u8> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| ((i + 1) as u8, count))
        .collect()
}

/// Standard progression rows from `first_level` to 20.
fn standard_progression(
    slots: &[&[u8]; 20],
    cantrips: [u8; 3],
    prepared: &[u8],
    first_level: u8,
) -> BTreeMap<u8, LevelProgression> {
    (first_level..=20)
        .map(|level| {
            let row = LevelProgression {
                slots: slot_map(slots[usize::from(level - 1)]),
                cantrips_known: cantrips_at(level, cantrips),
                prepared_spell_max: prepared.get(usize::from(level - first_level)).copied(),
                pact_slots: None,
            };
            (level, row)
        })
        .collect()
}

fn pact_progression() -> BTreeMap<u8, LevelProgression> {
    (1..=20u8)
        .map(|level| {
            let (count, slot_level) = PACT_MAGIC[usize::from(level - 1)];
            let row = LevelProgression {
                slots: BTreeMap::new(),
                cantrips_known: cantrips_at(level, [2, 3, 4]),
                prepared_spell_max: Some(PREPARED_WARLOCK[usize::from(level - 1)]),
                pact_slots: Some(PactSlots { slot_level, count }),
            };
            (level, row)
        })
        .collect()
}

fn profile(
    caster_type: CasterType,
    preparation: SpellPreparation,
    ability: Ability,
    progression: BTreeMap<u8, LevelProgression>,
) -> ClassSpellProfile {
    ClassSpellProfile {
        caster_type,
        preparation,
        spellcasting_ability: ability,
        progression,
        class_grants: Vec::new(),
    }
}

fn full_caster(
    ability: Ability,
    preparation: SpellPreparation,
    cantrips: [u8; 3],
    prepared: &[u8],
) -> ClassSpellProfile {
    profile(
        CasterType::Full,
        preparation,
        ability,
        standard_progression(&FULL_CASTER_SLOTS, cantrips, prepared, 1),
    )
}

fn half_caster(ability: Ability) -> ClassSpellProfile {
    profile(
        CasterType::Half,
        SpellPreparation::Prepared,
        ability,
        standard_progression(&HALF_CASTER_SLOTS, [0, 0, 0], &PREPARED_HALF_CASTER, 1),
    )
}

fn with_grant(
    mut spellcasting: ClassSpellProfile,
    spell: &str,
    trigger: GrantTrigger,
) -> ClassSpellProfile {
    spellcasting.class_grants.push(ClassSpellGrant {
        spell: spell.to_string(),
        trigger,
    });
    spellcasting
}

// ============================================================================
// Classes
// ============================================================================

fn requires(rule: PrerequisiteRule, requirements: &[(Ability, u8)]) -> MulticlassPrerequisite {
    MulticlassPrerequisite {
        rule,
        requirements: requirements
            .iter()
            .map(|&(ability, minimum)| AbilityRequirement::new(ability, minimum))
            .collect(),
    }
}

fn gains(
    armor: &[&str],
    weapons: &[&str],
    tools: &[&str],
    skill_choices: u8,
    skill_options: &[Skill],
) -> MulticlassGains {
    MulticlassGains {
        armor: owned(armor),
        weapons: owned(weapons),
        tools: owned(tools),
        skill_choices,
        skill_options: skill_options.to_vec(),
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

struct ClassSpec {
    id: &'static str,
    name: &'static str,
    hit_die: u8,
    saves: [Ability; 2],
    prerequisite: MulticlassPrerequisite,
    multiclass: MulticlassGains,
    spellcasting: Option<ClassSpellProfile>,
}

impl ClassSpec {
    fn into_record(self) -> ClassRecord {
        ClassRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            hit_die: self.hit_die,
            saving_throws: self.saves.to_vec(),
            spellcasting: self.spellcasting,
            prerequisite: self.prerequisite,
            multiclass: self.multiclass,
        }
    }
}

fn classes() -> Vec<ClassRecord> {
    use Ability::*;
    use PrerequisiteRule::{All, Any};

    let light = "Light armor";
    let medium = "Medium armor";
    let shields = "Shields";
    let martial = "Martial weapons";

    vec![
        ClassSpec {
            id: "barbarian",
            name: "Barbarian",
            hit_die: 12,
            saves: [Strength, Constitution],
            prerequisite: requires(All, &[(Strength, 13)]),
            multiclass: gains(&[shields], &[martial], &[], 0, &[]),
            spellcasting: None,
        },
        ClassSpec {
            id: "bard",
            name: "Bard",
            hit_die: 8,
            saves: [Dexterity, Charisma],
            prerequisite: requires(All, &[(Charisma, 13)]),
            multiclass: gains(&[light], &[], &["One musical instrument"], 1, Skill::all()),
            spellcasting: Some(full_caster(
                Charisma,
                SpellPreparation::Known,
                [2, 3, 4],
                &PREPARED_BARD_CLERIC_DRUID,
            )),
        },
        ClassSpec {
            id: "cleric",
            name: "Cleric",
            hit_die: 8,
            saves: [Wisdom, Charisma],
            prerequisite: requires(All, &[(Wisdom, 13)]),
            multiclass: gains(&[light, medium, shields], &[], &[], 0, &[]),
            spellcasting: Some(full_caster(
                Wisdom,
                SpellPreparation::Prepared,
                [3, 4, 5],
                &PREPARED_BARD_CLERIC_DRUID,
            )),
        },
        ClassSpec {
            id: "druid",
            name: "Druid",
            hit_die: 8,
            saves: [Intelligence, Wisdom],
            prerequisite: requires(All, &[(Wisdom, 13)]),
            multiclass: gains(&[light, shields], &[], &[], 0, &[]),
            spellcasting: Some(with_grant(
                full_caster(
                    Wisdom,
                    SpellPreparation::Prepared,
                    [2, 3, 4],
                    &PREPARED_BARD_CLERIC_DRUID,
                ),
                "Speak with Animals",
                GrantTrigger::AnySlot,
            )),
        },
        ClassSpec {
            id: "fighter",
            name: "Fighter",
            hit_die: 10,
            saves: [Strength, Constitution],
            prerequisite: requires(Any, &[(Strength, 13), (Dexterity, 13)]),
            multiclass: gains(&[light, medium, shields], &[martial], &[], 0, &[]),
            spellcasting: None,
        },
        ClassSpec {
            id: "monk",
            name: "Monk",
            hit_die: 8,
            saves: [Strength, Dexterity],
            prerequisite: requires(All, &[(Dexterity, 13), (Wisdom, 13)]),
            multiclass: MulticlassGains::default(),
            spellcasting: None,
        },
        ClassSpec {
            id: "paladin",
            name: "Paladin",
            hit_die: 10,
            saves: [Wisdom, Charisma],
            prerequisite: requires(All, &[(Strength, 13), (Charisma, 13)]),
            multiclass: gains(&[light, medium, shields], &[martial], &[], 0, &[]),
            spellcasting: Some(with_grant(
                with_grant(half_caster(Charisma), "Divine Smite", GrantTrigger::Level(2)),
                "Find Steed",
                GrantTrigger::Level(5),
            )),
        },
        ClassSpec {
            id: "ranger",
            name: "Ranger",
            hit_die: 10,
            saves: [Strength, Dexterity],
            prerequisite: requires(All, &[(Dexterity, 13), (Wisdom, 13)]),
            multiclass: gains(
                &[light, medium, shields],
                &[martial],
                &[],
                1,
                &[
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::Insight,
                    Skill::Investigation,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Stealth,
                    Skill::Survival,
                ],
            ),
            spellcasting: Some(with_grant(
                half_caster(Wisdom),
                "Hunter's Mark",
                GrantTrigger::Level(1),
            )),
        },
        ClassSpec {
            id: "rogue",
            name: "Rogue",
            hit_die: 8,
            saves: [Dexterity, Intelligence],
            prerequisite: requires(All, &[(Dexterity, 13)]),
            multiclass: gains(
                &[light],
                &[],
                &["Thieves' Tools"],
                1,
                &[
                    Skill::Acrobatics,
                    Skill::Athletics,
                    Skill::Deception,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Investigation,
                    Skill::Perception,
                    Skill::Persuasion,
                    Skill::SleightOfHand,
                    Skill::Stealth,
                ],
            ),
            spellcasting: None,
        },
        ClassSpec {
            id: "sorcerer",
            name: "Sorcerer",
            hit_die: 6,
            saves: [Constitution, Charisma],
            prerequisite: requires(All, &[(Charisma, 13)]),
            multiclass: MulticlassGains::default(),
            spellcasting: Some(full_caster(
                Charisma,
                SpellPreparation::Known,
                [4, 5, 6],
                &PREPARED_SORCERER,
            )),
        },
        ClassSpec {
            id: "warlock",
            name: "Warlock",
            hit_die: 8,
            saves: [Wisdom, Charisma],
            prerequisite: requires(All, &[(Charisma, 13)]),
            multiclass: gains(&[light], &[], &[], 0, &[]),
            spellcasting: Some(profile(
                CasterType::Pact,
                SpellPreparation::Known,
                Charisma,
                pact_progression(),
            )),
        },
        ClassSpec {
            id: "wizard",
            name: "Wizard",
            hit_die: 6,
            saves: [Intelligence, Wisdom],
            prerequisite: requires(All, &[(Intelligence, 13)]),
            multiclass: MulticlassGains::default(),
            spellcasting: Some(full_caster(
                Intelligence,
                SpellPreparation::Prepared,
                [3, 4, 5],
                &PREPARED_WIZARD,
            )),
        },
    ]
    .into_iter()
    .map(ClassSpec::into_record)
    .collect()
}

// ============================================================================
// Subclasses
// ============================================================================

fn grants(table: &[(u8, &[&str])]) -> Vec<AlwaysPreparedGrant> {
    table
        .iter()
        .flat_map(|&(level, spells)| {
            spells
                .iter()
                .map(move |spell| AlwaysPreparedGrant::new(*spell, level))
        })
        .collect()
}

fn subclass(
    id: &str,
    class_id: &str,
    name: &str,
    always_prepared: Vec<AlwaysPreparedGrant>,
) -> SubclassRecord {
    SubclassRecord {
        id: id.to_string(),
        class_id: class_id.to_string(),
        name: name.to_string(),
        always_prepared,
        spellcasting: None,
    }
}

fn subclasses() -> Vec<SubclassRecord> {
    let mut eldritch_knight = subclass("eldritch_knight", "fighter", "Eldritch Knight", Vec::new());
    eldritch_knight.spellcasting = Some(profile(
        CasterType::Third,
        SpellPreparation::Known,
        Ability::Intelligence,
        standard_progression(&THIRD_CASTER_SLOTS, [2, 2, 3], &PREPARED_ELDRITCH_KNIGHT, 3),
    ));

    vec![
        subclass(
            "life_domain",
            "cleric",
            "Life Domain",
            grants(&[
                (3, &["Aid", "Bless", "Cure Wounds", "Lesser Restoration"]),
                (5, &["Mass Healing Word", "Revivify"]),
                (7, &["Aura of Life", "Death Ward"]),
                (9, &["Greater Restoration", "Mass Cure Wounds"]),
            ]),
        ),
        subclass(
            "oath_of_devotion",
            "paladin",
            "Oath of Devotion",
            grants(&[
                (3, &["Protection from Evil and Good", "Shield of Faith"]),
                (5, &["Aid", "Zone of Truth"]),
                (9, &["Beacon of Hope", "Dispel Magic"]),
                (13, &["Freedom of Movement", "Guardian of Faith"]),
                (17, &["Commune", "Flame Strike"]),
            ]),
        ),
        subclass(
            "fiend_patron",
            "warlock",
            "Fiend Patron",
            grants(&[
                (3, &["Burning Hands", "Command", "Scorching Ray", "Suggestion"]),
                (5, &["Fireball", "Stinking Cloud"]),
                (7, &["Fire Shield", "Wall of Fire"]),
                (9, &["Geas", "Insect Plague"]),
            ]),
        ),
        subclass(
            "draconic_sorcery",
            "sorcerer",
            "Draconic Sorcery",
            grants(&[
                (3, &["Alter Self", "Chromatic Orb", "Command", "Dragon's Breath"]),
                (5, &["Fear", "Fly"]),
                (7, &["Arcane Eye", "Charm Monster"]),
                (9, &["Legend Lore", "Summon Dragon"]),
            ]),
        ),
        subclass("evoker", "wizard", "Evoker", Vec::new()),
        subclass("champion", "fighter", "Champion", Vec::new()),
        eldritch_knight,
        subclass("thief", "rogue", "Thief", Vec::new()),
        subclass("berserker", "barbarian", "Path of the Berserker", Vec::new()),
    ]
}

// ============================================================================
// Species, feats and tools
// ============================================================================

fn species(id: &str, name: &str, speed: u32) -> SpeciesRecord {
    SpeciesRecord {
        id: id.to_string(),
        name: name.to_string(),
        speed: Some(speed),
        ability_bonuses: AbilityBonuses::new(),
        effects: Vec::new(),
        always_prepared: Vec::new(),
    }
}

fn all_species() -> Vec<SpeciesRecord> {
    let mut dwarf = species("dwarf", "Dwarf", 30);
    dwarf.effects.push(TraitEffect::HitPointsPerLevel { amount: 1 });

    let mut tiefling = species("tiefling", "Tiefling", 30);
    tiefling.always_prepared = grants(&[
        (1, &["Fire Bolt"]),
        (3, &["Hellish Rebuke"]),
        (5, &["Darkness"]),
    ]);

    // Pre-2024 species with fixed ability increases.
    let mut mountain_dwarf = species("mountain_dwarf", "Mountain Dwarf (Legacy)", 25);
    mountain_dwarf.ability_bonuses = AbilityBonuses::new()
        .with(Ability::Strength, 2)
        .with(Ability::Constitution, 2);

    vec![
        species("human", "Human", 30),
        dwarf,
        species("elf", "Elf", 30),
        species("halfling", "Halfling", 30),
        species("gnome", "Gnome", 30),
        species("dragonborn", "Dragonborn", 30),
        species("orc", "Orc", 30),
        species("goliath", "Goliath", 35),
        tiefling,
        mountain_dwarf,
    ]
}

fn feat(id: &str, name: &str, effects: Vec<TraitEffect>) -> FeatRecord {
    FeatRecord {
        id: id.to_string(),
        name: name.to_string(),
        effects,
    }
}

fn feats() -> Vec<FeatRecord> {
    vec![
        feat("alert", "Alert", vec![TraitEffect::InitiativeProficiency]),
        feat("tough", "Tough", vec![TraitEffect::HitPointsPerLevel { amount: 2 }]),
        feat("speedy", "Speedy", vec![TraitEffect::Speed { amount: 10 }]),
        feat(
            "boon_of_fortitude",
            "Boon of Fortitude",
            vec![TraitEffect::FlatHitPoints { amount: 40 }],
        ),
        feat("boon_of_speed", "Boon of Speed", vec![TraitEffect::Speed { amount: 30 }]),
        feat("lucky", "Lucky", Vec::new()),
    ]
}

fn tool(id: &str, name: &str, skills: &[Skill]) -> ToolRecord {
    ToolRecord {
        id: id.to_string(),
        name: name.to_string(),
        skills: skills.to_vec(),
    }
}

fn tools() -> Vec<ToolRecord> {
    vec![
        tool("thieves_tools", "Thieves' Tools", &[Skill::SleightOfHand]),
        tool("herbalism_kit", "Herbalism Kit", &[Skill::Medicine, Skill::Nature]),
        tool("navigators_tools", "Navigator's Tools", &[Skill::Survival]),
        tool("disguise_kit", "Disguise Kit", &[Skill::Deception, Skill::Performance]),
        tool("forgery_kit", "Forgery Kit", &[Skill::Deception]),
        tool("cartographers_tools", "Cartographer's Tools", &[Skill::Survival, Skill::History]),
        tool("alchemists_supplies", "Alchemist's Supplies", &[Skill::Arcana]),
    ]
}

// ============================================================================
// Spells
// ============================================================================

const SPELLS: &[(u8, &[&str])] = &[
    (
        0,
        &[
            "Chill Touch", "Dancing Lights", "Druidcraft", "Eldritch Blast", "Fire Bolt",
            "Friends", "Guidance", "Light", "Mage Hand", "Mending", "Message",
            "Minor Illusion", "Poison Spray", "Prestidigitation", "Produce Flame",
            "Ray of Frost", "Sacred Flame", "Shillelagh", "Shocking Grasp", "Spare the Dying",
            "Thaumaturgy", "Thorn Whip", "Toll the Dead", "Vicious Mockery",
        ],
    ),
    (
        1,
        &[
            "Armor of Agathys", "Bless", "Burning Hands", "Charm Person", "Chromatic Orb",
            "Command", "Comprehend Languages", "Cure Wounds", "Detect Magic", "Disguise Self",
            "Dissonant Whispers", "Divine Smite", "Ensnaring Strike", "Entangle", "Faerie Fire",
            "Feather Fall", "Goodberry", "Guiding Bolt", "Healing Word", "Hellish Rebuke",
            "Heroism", "Hex", "Hunter's Mark", "Identify", "Mage Armor", "Magic Missile",
            "Protection from Evil and Good", "Shield", "Shield of Faith", "Sleep",
            "Speak with Animals", "Thunderwave",
        ],
    ),
    (
        2,
        &[
            "Aid", "Alter Self", "Darkness", "Dragon's Breath", "Find Steed", "Hold Person",
            "Invisibility", "Lesser Restoration", "Mirror Image", "Misty Step", "Moonbeam",
            "Pass without Trace", "Scorching Ray", "Shatter", "Spiritual Weapon", "Suggestion",
            "Web", "Zone of Truth",
        ],
    ),
    (
        3,
        &[
            "Beacon of Hope", "Call Lightning", "Counterspell", "Dispel Magic", "Fear",
            "Fireball", "Fly", "Haste", "Hypnotic Pattern", "Lightning Bolt",
            "Mass Healing Word", "Revivify", "Spirit Guardians", "Stinking Cloud",
        ],
    ),
    (
        4,
        &[
            "Arcane Eye", "Aura of Life", "Banishment", "Charm Monster", "Death Ward",
            "Dimension Door", "Fire Shield", "Freedom of Movement", "Greater Invisibility",
            "Guardian of Faith", "Polymorph", "Wall of Fire",
        ],
    ),
    (
        5,
        &[
            "Commune", "Cone of Cold", "Flame Strike", "Geas", "Greater Restoration",
            "Hold Monster", "Insect Plague", "Legend Lore", "Mass Cure Wounds", "Raise Dead",
            "Summon Dragon", "Wall of Force",
        ],
    ),
    (6, &["Chain Lightning", "Disintegrate", "Heal", "True Seeing"]),
    (7, &["Finger of Death", "Plane Shift", "Resurrection", "Teleport"]),
    (8, &["Antimagic Field", "Power Word Stun", "Sunburst"]),
    (9, &["Foresight", "Meteor Swarm", "Power Word Kill", "True Resurrection", "Wish"]),
];

fn spells() -> Vec<SpellRecord> {
    SPELLS
        .iter()
        .flat_map(|&(level, names)| names.iter().map(move |name| SpellRecord::new(*name, level)))
        .collect()
}

fn warning(classes: [&str; 2], message: &str) -> MulticlassWarning {
    MulticlassWarning {
        classes: classes.iter().map(|c| c.to_string()).collect(),
        message: message.to_string(),
    }
}

fn warnings() -> Vec<MulticlassWarning> {
    vec![
        warning(
            ["barbarian", "wizard"],
            "Rage prevents casting spells and concentrating on them.",
        ),
        warning(
            ["barbarian", "sorcerer"],
            "Rage prevents casting spells and concentrating on them.",
        ),
        warning(
            ["monk", "barbarian"],
            "Unarmored Defense does not stack. Rage and Martial Arts compete for the bonus action.",
        ),
        warning(
            ["warlock", "sorcerer"],
            "Pact Magic slots refresh on a short rest while Spellcasting slots need a long rest.",
        ),
        warning(
            ["warlock", "wizard"],
            "Pact Magic slots refresh on a short rest while Spellcasting slots need a long rest.",
        ),
    ]
}

fn srd_data() -> CatalogData {
    CatalogData {
        classes: classes(),
        subclasses: subclasses(),
        species: all_species(),
        feats: feats(),
        tools: tools(),
        spells: spells(),
        multiclass_warnings: warnings(),
    }
}
