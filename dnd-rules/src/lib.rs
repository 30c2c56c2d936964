//! D&D 5e character rules engine.
//!
//! This crate provides:
//! - Derived character numbers (modifiers, HP, AC, saves, skills, spell DC)
//! - Spellcasting resources, always-prepared grants and spell selection
//! - Multiclass prerequisites, gains and warnings
//! - d20 test resolution with conditions, exhaustion and advantage rules
//! - A data-driven catalog with the SRD content built in
//!
//! Lookups never fail hard: missing catalog entries produce fallbacks plus
//! [`Notice`]s carried next to the value in [`Resolved`].
//!
//! # Quick Start
//!
//! ```
//! use dnd_rules::{
//!     Ability, AbilityScores, ClassEntry, DerivedStatsInput, RngRoller, RollContext,
//!     RulesEngine, Situation, TestKind,
//! };
//!
//! let engine = RulesEngine::srd();
//! let input = DerivedStatsInput::new(AbilityScores::new(15, 14, 13, 8, 12, 10))
//!     .with_species("dwarf")
//!     .with_class(ClassEntry::new("fighter", 3));
//!
//! let stats = engine.derived_stats(&input).value;
//! assert_eq!(stats.proficiency_bonus, 2);
//!
//! let save = RollContext::new(
//!     TestKind::SavingThrow(Ability::Strength),
//!     stats.saving_throw(Ability::Strength),
//! );
//! let outcome = engine
//!     .resolve_test(&save, &Situation::new(), &mut RngRoller::seeded(7))
//!     .value;
//! println!("{outcome}");
//! ```

pub mod abilities;
pub mod catalog;
pub mod checks;
pub mod conditions;
pub mod config;
pub mod derived;
pub mod diagnostics;
pub mod dice;
pub mod engine;
pub mod multiclass;
pub mod spellcasting;
pub mod srd;
pub mod testing;

// Primary public API
pub use abilities::{
    ability_modifier, Ability, AbilityBonuses, AbilityScores, ProficiencyLevel, Skill,
};
pub use catalog::{
    CasterType, Catalog, CatalogData, CatalogError, ClassRecord, FeatRecord, SpeciesRecord,
    SpellRecord, SubclassRecord, ToolRecord, TraitEffect,
};
pub use checks::{
    plan_test, resolve_test, roll_plan, RollContext, RollOutcome, Situation, TestKind,
    TestOutcome, TestPlan, TravelPace,
};
pub use conditions::{Condition, ConditionKind};
pub use config::RulesOptions;
pub use derived::{
    compute_derived_stats, proficiency_bonus, ArmorClass, ArmorType, ClassEntry, DerivedStats,
    DerivedStatsInput,
};
pub use diagnostics::{Notice, Resolved};
pub use dice::{Advantage, DieRoller, RngRoller};
pub use engine::{RulesEngine, SpellBook};
pub use multiclass::{
    eligible_classes, multiclass_gains, multiclass_warnings, ClassEligibility, ClassGains,
};
pub use spellcasting::{
    always_prepared_spells, combined_caster_level, resolve_spellcasting, AlwaysPrepared,
    AlwaysPreparedQuery, SelectionError, SpellSelection, SpellcastingResources,
};
pub use srd::srd;
