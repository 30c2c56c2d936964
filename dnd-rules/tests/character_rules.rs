//! Integration tests for character numbers, spellcasting and multiclassing
//! against the built-in SRD catalog and a caller-supplied catalog.

use dnd_rules::abilities::{Ability, AbilityBonuses, AbilityScores, ProficiencyLevel, Skill};
use dnd_rules::catalog::Catalog;
use dnd_rules::derived::{ArmorClass, ArmorType, ClassEntry, DerivedStatsInput};
use dnd_rules::diagnostics::{GrantSource, Notice};
use dnd_rules::spellcasting::{AlwaysPreparedQuery, SelectionError, SpellSelection};
use dnd_rules::testing::{assert_clean, assert_notice, sample_fighter, sample_wizard};
use dnd_rules::RulesEngine;

// =============================================================================
// Derived stats
// =============================================================================

#[test]
fn test_level_one_fighter_baseline() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(10, 14, 14, 10, 10, 10))
        .with_class(ClassEntry::new("fighter", 1));

    let resolved = engine.derived_stats(&input);
    assert_clean(&resolved);
    let stats = resolved.value;
    assert_eq!(stats.armor_class, 12);
    assert_eq!(stats.initiative, 2);
    assert_eq!(stats.proficiency_bonus, 2);
    assert_eq!(stats.max_hit_points, 12);
    assert_eq!(stats.speed, 30);
}

#[test]
fn test_level_five_hit_points() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(10, 10, 14, 10, 10, 10))
        .with_class(ClassEntry::new("fighter", 5));
    let stats = engine.derived_stats(&input).value;
    assert_eq!(stats.max_hit_points, 44);
    assert_eq!(stats.proficiency_bonus, 3);
}

#[test]
fn test_sample_fighter_sheet() {
    let engine = RulesEngine::srd();
    let resolved = engine.derived_stats(&sample_fighter());
    assert_clean(&resolved);
    let stats = resolved.value;

    // 15 + 2 background, 14 + 1 background
    assert_eq!(stats.ability_scores.strength, 17);
    assert_eq!(stats.ability_scores.constitution, 15);
    assert_eq!(stats.modifier(Ability::Strength), 3);

    // Heavy armor ignores Dex: 16 + 2 shield
    assert_eq!(stats.armor_class, 18);
    // 10 + 2 at level 1, then 6 + 2 twice
    assert_eq!(stats.max_hit_points, 28);
    assert_eq!(stats.saving_throw(Ability::Strength), 5);
    assert_eq!(stats.saving_throw(Ability::Dexterity), 1);
    assert_eq!(stats.skill(Skill::Athletics), 5);
    assert_eq!(stats.passive_perception, 13);
    assert!(stats.spellcasting.is_none());
}

#[test]
fn test_sample_wizard_spell_numbers() {
    let engine = RulesEngine::srd();
    let stats = engine.derived_stats(&sample_wizard()).value;
    // INT 15 + 2 = 17 (+3), PB 3
    let casting = stats.spellcasting.as_ref().expect("wizard casts spells");
    assert_eq!(casting.ability, Ability::Intelligence);
    assert_eq!(casting.save_dc, 14);
    assert_eq!(casting.attack_bonus, 6);
    // Expertise doubles proficiency
    assert_eq!(stats.skill(Skill::History), 3 + 6);
}

#[test]
fn test_species_traits_and_feats() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(10, 12, 10, 10, 10, 10))
        .with_species("dwarf")
        .with_feat("tough")
        .with_feat("alert")
        .with_feat("speedy")
        .with_class(ClassEntry::new("rogue", 4));
    let stats = engine.derived_stats(&input).value;

    // 8 + 3 * 5 = 23, plus 1 (dwarf) and 2 (tough) per level
    assert_eq!(stats.max_hit_points, 23 + 4 * 3);
    assert_eq!(stats.initiative, 1 + 2);
    assert_eq!(stats.speed, 40);
}

#[test]
fn test_legacy_species_bonus_precedence() {
    let engine = RulesEngine::srd();
    let background = AbilityBonuses::new().with(Ability::Dexterity, 2);
    let base = DerivedStatsInput::new(AbilityScores::default())
        .with_species("mountain_dwarf")
        .with_background_bonus(background)
        .with_class(ClassEntry::new("fighter", 1));

    // The species' own increases win over the background
    let stats = engine.derived_stats(&base).value;
    assert_eq!(stats.ability_scores.strength, 12);
    assert_eq!(stats.ability_scores.dexterity, 10);
    assert_eq!(stats.speed, 25);

    // An explicit species bonus wins over both
    let explicit = base.with_species_bonus(AbilityBonuses::new().with(Ability::Wisdom, 1));
    let stats = engine.derived_stats(&explicit).value;
    assert_eq!(stats.ability_scores.wisdom, 11);
    assert_eq!(stats.ability_scores.strength, 10);
}

#[test]
fn test_unknown_records_fall_back_with_notices() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::default())
        .with_species("warforged")
        .with_feat("mystery_feat")
        .with_class(ClassEntry::new("artificer", 2));
    let resolved = engine.derived_stats(&input);

    assert_notice(&resolved, &Notice::UnknownSpecies { id: "warforged".into() });
    assert_notice(&resolved, &Notice::UnknownFeat { id: "mystery_feat".into() });
    assert_notice(&resolved, &Notice::UnknownClass { id: "artificer".into() });
    // Fallback d8 and speed 30
    assert_eq!(resolved.value.max_hit_points, 8 + 5);
    assert_eq!(resolved.value.speed, 30);
}

#[test]
fn test_medium_armor_caps_dex() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(10, 18, 10, 10, 10, 10))
        .with_class(ClassEntry::new("ranger", 1))
        .with_armor(ArmorClass::worn(ArmorType::Medium, 14));
    assert_eq!(engine.derived_stats(&input).value.armor_class, 16);
}

// =============================================================================
// Spellcasting
// =============================================================================

#[test]
fn test_wizard_resources() {
    let engine = RulesEngine::srd();
    let resolved = engine.spellcasting("wizard", None, 5);
    assert_clean(&resolved);
    let wizard = resolved.value;
    assert_eq!(wizard.slots_by_level.get(&1), Some(&4));
    assert_eq!(wizard.slots_by_level.get(&2), Some(&3));
    assert_eq!(wizard.slots_by_level.get(&3), Some(&2));
    assert_eq!(wizard.cantrips_known, 4);
    assert_eq!(wizard.prepared_spell_max, Some(9));
    assert_eq!(wizard.max_spell_level(), 3);
}

#[test]
fn test_warlock_pact_pool() {
    let engine = RulesEngine::srd();
    let warlock = engine.spellcasting("warlock", Some("fiend_patron"), 5).value;
    assert!(warlock.slots_by_level.is_empty());
    let pact = warlock.pact_slots.expect("warlocks have pact slots");
    assert_eq!((pact.slot_level, pact.count), (3, 2));
    assert_eq!(warlock.max_spell_level(), 3);
}

#[test]
fn test_non_caster_and_subclass_caster() {
    let engine = RulesEngine::srd();
    let champion = engine.spellcasting("fighter", Some("champion"), 10).value;
    assert!(!champion.has_spellcasting());

    let knight = engine.spellcasting("fighter", Some("eldritch_knight"), 7).value;
    assert_eq!(knight.spellcasting_ability, Some(Ability::Intelligence));
    assert_eq!(knight.max_spell_level(), 2);
}

#[test]
fn test_combined_caster_level() {
    let engine = RulesEngine::srd();
    let classes = [
        ClassEntry::new("wizard", 5),
        ClassEntry::new("paladin", 3),
        ClassEntry::new("warlock", 2),
        ClassEntry::new("fighter", 3).with_subclass("eldritch_knight"),
    ];
    let resolved = engine.combined_caster_level(&classes);
    assert_clean(&resolved);
    assert_eq!(resolved.value, 5 + 1 + 0 + 1);
}

#[test]
fn test_always_prepared_union() {
    let engine = RulesEngine::srd();
    let query = AlwaysPreparedQuery::class("cleric", 5)
        .with_subclass("life_domain")
        .with_species("tiefling")
        .with_character_level(3);
    let prepared = engine.always_prepared(&query);
    assert_clean(&prepared);
    let prepared = prepared.value;

    assert!(prepared.contains("bless"));
    assert!(prepared.contains("Hellish Rebuke"));
    // Species grants follow character level, not class level
    assert!(!prepared.contains("Darkness"));

    let again = engine.always_prepared(&query).value;
    assert_eq!(prepared, again);
}

#[test]
fn test_selection_respects_limits() {
    let engine = RulesEngine::srd();
    let book = engine
        .spell_book(&ClassEntry::new("wizard", 1), None, 0)
        .value;
    let limits = engine.selection_limits(&book);
    let mut selection = SpellSelection::new();

    selection
        .select_all(["Fire Bolt", "Mage Hand", "Light"], &limits)
        .expect("three cantrips fit");
    assert_eq!(
        selection.select("Ray of Frost", &limits),
        Err(SelectionError::CantripLimit { limit: 3 })
    );

    assert!(matches!(
        selection.select("Fireball", &limits),
        Err(SelectionError::SpellLevelTooHigh { level: 3, max: 1, .. })
    ));

    // A batch that overflows leaves the selection untouched
    let before = selection.clone();
    let result = selection.select_all(
        ["Magic Missile", "Shield", "Sleep", "Identify", "Mage Armor"],
        &limits,
    );
    assert_eq!(result, Err(SelectionError::PreparedLimit { limit: 4 }));
    assert_eq!(selection, before);

    assert!(selection.deselect("light"));
    assert!(selection.validate(&limits).is_ok());
}

#[test]
fn test_unresolved_grant_notice() {
    let json = r#"{
        "classes": [{
            "id": "oracle", "name": "Oracle", "hit_die": 8,
            "spellcasting": {
                "caster_type": "full", "spellcasting_ability": "wisdom",
                "progression": { "1": { "slots": { "1": 2 }, "cantrips_known": 2 } },
                "class_grants": [{ "spell": "Augury", "trigger": "any_slot" }]
            }
        }],
        "spells": [{ "name": "Guidance", "level": 0 }]
    }"#;
    let catalog = Catalog::from_json(json).expect("valid catalog");
    let engine = RulesEngine::new(&catalog);
    let prepared = engine.always_prepared(&AlwaysPreparedQuery::class("oracle", 1));
    assert!(prepared.value.is_empty());
    assert_notice(
        &prepared,
        &Notice::UnresolvedSpell {
            name: "Augury".into(),
            source: GrantSource::Class,
        },
    );
}

// =============================================================================
// Multiclassing
// =============================================================================

#[test]
fn test_multiclass_flow() {
    let engine = RulesEngine::srd();
    let scores = AbilityScores::new(16, 13, 14, 8, 10, 13);

    let options = engine.eligible_classes(&scores, &["fighter"]).value;
    let paladin = options
        .iter()
        .find(|c| c.class_id == "paladin")
        .expect("paladin is listed");
    assert!(paladin.eligible);
    let wizard = options
        .iter()
        .find(|c| c.class_id == "wizard")
        .expect("wizard is listed");
    assert!(!wizard.eligible);
    assert!(options.iter().all(|c| c.class_id != "fighter"));

    let gains = engine.multiclass_gains("paladin").value;
    assert_eq!(gains.hit_die, 10);
    assert!(gains.armor.contains(&"Shields".to_string()));

    assert!(engine.multiclass_warnings(&["fighter", "paladin"]).is_empty());
    assert_eq!(engine.multiclass_warnings(&["Sorcerer", "Warlock"]).len(), 1);
}

#[test]
fn test_skill_proficiency_levels() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(10, 16, 10, 10, 10, 10))
        .with_class(ClassEntry::new("rogue", 1))
        .with_skill(Skill::Stealth, ProficiencyLevel::Expertise)
        .with_skill(Skill::Acrobatics, ProficiencyLevel::Half);
    let stats = engine.derived_stats(&input).value;
    assert_eq!(stats.skill(Skill::Stealth), 3 + 4);
    assert_eq!(stats.skill(Skill::Acrobatics), 3 + 1);
    assert_eq!(stats.skill(Skill::SleightOfHand), 3);
}
