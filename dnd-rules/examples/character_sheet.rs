//! Print a character sheet and a few d20 tests for a multiclass character

use dnd_rules::abilities::{Ability, AbilityBonuses, AbilityScores, ProficiencyLevel, Skill};
use dnd_rules::checks::{RollContext, Situation, TestKind, TravelPace};
use dnd_rules::conditions::Condition;
use dnd_rules::derived::{ArmorClass, ArmorType, ClassEntry, DerivedStatsInput};
use dnd_rules::dice::RngRoller;
use dnd_rules::RulesEngine;

fn main() {
    let engine = RulesEngine::srd();
    let input = DerivedStatsInput::new(AbilityScores::new(14, 15, 13, 10, 12, 8))
        .with_species("halfling")
        .with_background_bonus(
            AbilityBonuses::new()
                .with(Ability::Dexterity, 2)
                .with(Ability::Wisdom, 1),
        )
        .with_class(ClassEntry::new("rogue", 3).with_subclass("thief"))
        .with_class(ClassEntry::new("ranger", 2))
        .with_feat("alert")
        .with_skill(Skill::Stealth, ProficiencyLevel::Expertise)
        .with_skill(Skill::Survival, ProficiencyLevel::Proficient)
        .with_skill(Skill::SleightOfHand, ProficiencyLevel::Proficient)
        .with_armor(ArmorClass::worn(ArmorType::Light, 12));

    let resolved = engine.derived_stats(&input);
    for notice in &resolved.notices {
        println!("notice: {notice}");
    }
    let stats = resolved.value;

    println!("=== Character Sheet (level {}) ===\n", stats.level);
    for ability in Ability::all() {
        println!(
            "{} {:>2} ({:+})  save {:+}",
            ability.abbreviation(),
            stats.ability_scores.get(ability),
            stats.modifier(ability),
            stats.saving_throw(ability)
        );
    }
    println!();
    println!(
        "HP {}  AC {}  Initiative {:+}  Speed {} ft",
        stats.max_hit_points, stats.armor_class, stats.initiative, stats.speed
    );
    println!(
        "Proficiency {:+}  Passive Perception {}",
        stats.proficiency_bonus, stats.passive_perception
    );
    if let Some(casting) = &stats.spellcasting {
        println!("Spell save DC {}  Spell attack {:+}", casting.save_dc, casting.attack_bonus);
    }

    let ranger = engine.spell_book(&ClassEntry::new("ranger", 2), Some("halfling"), 5).value;
    println!("\nRanger slots: {:?}", ranger.resources.slots_by_level);
    println!("Always prepared: {:?}", ranger.always_prepared.names());
    let caster_level = engine.combined_caster_level(&input.classes).value;
    println!("Caster level for multiclass slots: {caster_level}");

    let scores = stats.ability_scores;
    println!("\n=== Multiclass Options ===\n");
    for option in engine.eligible_classes(&scores, &["rogue", "ranger"]).value {
        println!("{:<10} {}", option.class_name, if option.eligible { "eligible" } else { "-" });
    }

    println!("\n=== d20 Tests ===\n");
    let mut roller = RngRoller::thread();
    let situation = Situation::new()
        .with_pace(TravelPace::Fast)
        .with_skill(Skill::Survival, ProficiencyLevel::Proficient)
        .with_skill(Skill::SleightOfHand, ProficiencyLevel::Proficient)
        .with_tool("thieves_tools")
        .with_condition(Condition::exhaustion(1));

    let tests = [
        TestKind::SkillCheck(Skill::Survival),
        TestKind::SkillCheck(Skill::SleightOfHand),
        TestKind::SkillCheck(Skill::Stealth),
        TestKind::SavingThrow(Ability::Dexterity),
    ];
    for test in tests {
        let modifier = match test {
            TestKind::SkillCheck(skill) => stats.skill(skill),
            TestKind::SavingThrow(ability) => stats.saving_throw(ability),
            _ => 0,
        };
        let ctx = RollContext::new(test, modifier);
        let outcome = engine.resolve_test(&ctx, &situation, &mut roller).value;
        println!("{test}: {outcome}");
    }
}
