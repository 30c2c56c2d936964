//! Rules engine facade.
//!
//! [`RulesEngine`] binds a catalog and a set of options so callers don't have
//! to thread them through every call. Every method is a thin wrapper over a
//! free function in the owning module.

use crate::abilities::AbilityScores;
use crate::catalog::Catalog;
use crate::checks::{plan_test, resolve_test, RollContext, Situation, TestOutcome, TestPlan};
use crate::conditions::{exhaustion_level, Condition};
use crate::config::RulesOptions;
use crate::derived::{compute_derived_stats, ClassEntry, DerivedStats, DerivedStatsInput};
use crate::diagnostics::{NoticeLog, Resolved};
use crate::dice::DieRoller;
use crate::multiclass::{
    eligible_classes, multiclass_gains, multiclass_warnings, ClassEligibility, ClassGains,
};
use crate::spellcasting::{
    always_prepared_spells, combined_caster_level, resolve_spellcasting, AlwaysPrepared,
    AlwaysPreparedQuery, SelectionLimits, SpellcastingResources,
};
use crate::srd::srd;

/// Spellcasting state for one class of a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellBook {
    pub resources: SpellcastingResources,
    pub always_prepared: AlwaysPrepared,
}

/// The rules engine answers rules questions against one catalog.
#[derive(Debug, Clone)]
pub struct RulesEngine<'a> {
    catalog: &'a Catalog,
    options: RulesOptions,
}

impl RulesEngine<'static> {
    /// Engine over the built-in SRD catalog with default options.
    pub fn srd() -> Self {
        Self::new(srd())
    }
}

impl<'a> RulesEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            options: RulesOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RulesOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn options(&self) -> &RulesOptions {
        &self.options
    }

    // ========================================================================
    // Character numbers
    // ========================================================================

    pub fn derived_stats(&self, input: &DerivedStatsInput) -> Resolved<DerivedStats> {
        compute_derived_stats(input, self.catalog, &self.options)
    }

    pub fn spellcasting(
        &self,
        class_id: &str,
        subclass_id: Option<&str>,
        level: u8,
    ) -> Resolved<SpellcastingResources> {
        resolve_spellcasting(self.catalog, class_id, subclass_id, level, &self.options)
    }

    pub fn always_prepared(&self, query: &AlwaysPreparedQuery) -> Resolved<AlwaysPrepared> {
        always_prepared_spells(self.catalog, query, &self.options)
    }

    /// Resources and always-prepared spells for one class entry.
    ///
    /// `character_level` gates species grants; 0 means the class level.
    pub fn spell_book(
        &self,
        entry: &ClassEntry,
        species_id: Option<&str>,
        character_level: u8,
    ) -> Resolved<SpellBook> {
        let mut log = NoticeLog::new();
        let resources = log.absorb(self.spellcasting(
            &entry.class_id,
            entry.subclass_id.as_deref(),
            entry.level,
        ));

        let mut query = AlwaysPreparedQuery::class(entry.class_id.clone(), entry.level)
            .with_character_level(character_level);
        if let Some(subclass_id) = entry.subclass_id.as_deref() {
            query = query.with_subclass(subclass_id);
        }
        if let Some(species_id) = species_id {
            query = query.with_species(species_id);
        }
        let always_prepared = log.absorb(self.always_prepared(&query));

        log.finish(SpellBook {
            resources,
            always_prepared,
        })
    }

    /// Limits a [`SpellSelection`](crate::spellcasting::SpellSelection) is
    /// checked against.
    pub fn selection_limits<'b>(&self, book: &'b SpellBook) -> SelectionLimits<'b>
    where
        'a: 'b,
    {
        SelectionLimits {
            catalog: self.catalog,
            resources: &book.resources,
            always_prepared: &book.always_prepared,
        }
    }

    pub fn combined_caster_level(&self, classes: &[ClassEntry]) -> Resolved<u8> {
        combined_caster_level(self.catalog, classes)
    }

    // ========================================================================
    // Multiclassing
    // ========================================================================

    pub fn eligible_classes<S: AsRef<str>>(
        &self,
        scores: &AbilityScores,
        current_class_ids: &[S],
    ) -> Resolved<Vec<ClassEligibility>> {
        eligible_classes(self.catalog, scores, current_class_ids)
    }

    pub fn multiclass_gains(&self, class_id: &str) -> Resolved<ClassGains> {
        multiclass_gains(self.catalog, class_id, &self.options)
    }

    pub fn multiclass_warnings<S: AsRef<str>>(&self, class_ids: &[S]) -> Vec<String> {
        multiclass_warnings(self.catalog, class_ids)
    }

    // ========================================================================
    // d20 tests
    // ========================================================================

    pub fn plan_test(&self, ctx: &RollContext, situation: &Situation) -> Resolved<TestPlan> {
        plan_test(ctx, situation, self.catalog, &self.options)
    }

    pub fn resolve_test<D: DieRoller + ?Sized>(
        &self,
        ctx: &RollContext,
        situation: &Situation,
        roller: &mut D,
    ) -> Resolved<TestOutcome> {
        resolve_test(ctx, situation, self.catalog, &self.options, roller)
    }

    /// Exhaustion level implied by a condition list.
    pub fn exhaustion_level(&self, conditions: &[Condition]) -> u8 {
        exhaustion_level(conditions)
    }
}
