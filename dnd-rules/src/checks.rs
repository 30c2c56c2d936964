//! d20 test resolution.
//!
//! A test goes through a fixed sequence:
//!
//! 1. auto-fail short-circuit (Strength/Dexterity saves under an
//!    incapacitating condition, or a caller-forced failure),
//! 2. advantage aggregation, where each rule only fires while the state is
//!    still normal: tool synergy, then travel pace, then restrained,
//! 3. the exhaustion penalty,
//! 4. rolling one or two d20s.
//!
//! Steps 1-3 are pure and exposed as [`plan_test`]; [`roll_plan`] performs
//! step 4 with any [`DieRoller`].

use crate::abilities::{Ability, ProficiencyLevel, Skill};
use crate::catalog::Catalog;
use crate::conditions::{
    exhaustion_level, has_condition, save_auto_fail_condition, Condition, ConditionKind,
    MAX_EXHAUSTION,
};
use crate::config::RulesOptions;
use crate::diagnostics::{Notice, NoticeLog, Resolved};
use crate::dice::{roll_d20, Advantage, D20Roll, DieRoller};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Inputs
// ============================================================================

/// What kind of d20 test is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    AbilityCheck(Ability),
    SkillCheck(Skill),
    SavingThrow(Ability),
    AttackRoll,
    Initiative,
}

impl TestKind {
    pub fn skill(&self) -> Option<Skill> {
        match self {
            TestKind::SkillCheck(skill) => Some(*skill),
            _ => None,
        }
    }

    pub fn is_saving_throw(&self) -> bool {
        matches!(self, TestKind::SavingThrow(_))
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::AbilityCheck(ability) => write!(f, "{} check", ability.name()),
            TestKind::SkillCheck(skill) => write!(f, "{} check", skill.name()),
            TestKind::SavingThrow(ability) => write!(f, "{} saving throw", ability.name()),
            TestKind::AttackRoll => write!(f, "attack roll"),
            TestKind::Initiative => write!(f, "initiative"),
        }
    }
}

/// Overland travel pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelPace {
    Fast,
    Normal,
    Slow,
}

impl TravelPace {
    /// Advantage state this pace imposes on a skill, if any.
    pub fn effect_on(&self, skill: Skill) -> Option<Advantage> {
        match (self, skill) {
            (TravelPace::Fast, Skill::Perception | Skill::Survival | Skill::Stealth) => {
                Some(Advantage::Disadvantage)
            }
            (TravelPace::Normal, Skill::Stealth) => Some(Advantage::Disadvantage),
            (TravelPace::Slow, Skill::Perception | Skill::Survival) => Some(Advantage::Advantage),
            _ => None,
        }
    }
}

impl fmt::Display for TravelPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelPace::Fast => write!(f, "fast pace"),
            TravelPace::Normal => write!(f, "normal pace"),
            TravelPace::Slow => write!(f, "slow pace"),
        }
    }
}

/// A named additive term such as Bless or cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBonus {
    pub name: String,
    pub value: i32,
}

impl NamedBonus {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The numbers a test starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollContext {
    pub test: TestKind,
    pub base_modifier: i32,
    #[serde(default)]
    pub advantage: Advantage,
    #[serde(default)]
    pub exhaustion_level: u8,
    /// Forces a failure regardless of the test kind.
    #[serde(default)]
    pub auto_fail: bool,
    #[serde(default)]
    pub bonus_sources: Vec<NamedBonus>,
}

impl RollContext {
    pub fn new(test: TestKind, base_modifier: i32) -> Self {
        Self {
            test,
            base_modifier,
            advantage: Advantage::Normal,
            exhaustion_level: 0,
            auto_fail: false,
            bonus_sources: Vec::new(),
        }
    }

    pub fn with_advantage(mut self, advantage: Advantage) -> Self {
        self.advantage = advantage;
        self
    }

    pub fn with_exhaustion(mut self, level: u8) -> Self {
        self.exhaustion_level = level;
        self
    }

    pub fn with_auto_fail(mut self) -> Self {
        self.auto_fail = true;
        self
    }

    pub fn with_bonus(mut self, name: impl Into<String>, value: i32) -> Self {
        self.bonus_sources.push(NamedBonus::new(name, value));
        self
    }
}

/// Read-only snapshot of the character's circumstances at roll time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Situation {
    pub conditions: Vec<Condition>,
    pub pace: Option<TravelPace>,
    pub skill_proficiencies: BTreeMap<Skill, ProficiencyLevel>,
    /// Tool ids or names, looked up in the catalog.
    pub tool_proficiencies: Vec<String>,
}

impl Situation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn with_pace(mut self, pace: TravelPace) -> Self {
        self.pace = Some(pace);
        self
    }

    pub fn with_skill(mut self, skill: Skill, level: ProficiencyLevel) -> Self {
        self.skill_proficiencies.insert(skill, level);
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool_proficiencies.push(tool.into());
        self
    }

    fn proficient_in(&self, skill: Skill) -> bool {
        self.skill_proficiencies
            .get(&skill)
            .is_some_and(|level| level.is_proficient())
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Why the advantage state is what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum AdvantageCause {
    Requested,
    ToolSynergy { tool: String },
    TravelPace { pace: TravelPace },
    Restrained,
}

impl fmt::Display for AdvantageCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvantageCause::Requested => write!(f, "requested"),
            AdvantageCause::ToolSynergy { tool } => write!(f, "tool synergy: {tool}"),
            AdvantageCause::TravelPace { pace } => write!(f, "{pace}"),
            AdvantageCause::Restrained => write!(f, "restrained"),
        }
    }
}

/// Why a test failed without a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "condition", rename_all = "snake_case")]
pub enum AutoFailReason {
    Condition(ConditionKind),
    Forced,
}

impl fmt::Display for AutoFailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoFailReason::Condition(kind) => write!(f, "{kind}"),
            AutoFailReason::Forced => write!(f, "forced"),
        }
    }
}

/// Everything decided before the dice are thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    pub test: TestKind,
    pub auto_fail: Option<AutoFailReason>,
    pub advantage: Advantage,
    pub advantage_cause: Option<AdvantageCause>,
    pub base_modifier: i32,
    pub exhaustion_level: u8,
    /// Zero or negative.
    pub exhaustion_penalty: i32,
    pub bonus_sources: Vec<NamedBonus>,
    /// Base modifier plus every adjustment.
    pub modifier: i32,
}

impl TestPlan {
    /// Formula label disclosing every adjustment.
    ///
    /// `2d20kl1 [DIS: fast pace] + 3 - 4 (exhaustion 2) + 2 (Bless)`
    pub fn label(&self) -> String {
        if let Some(reason) = self.auto_fail {
            return format!("auto-fail ({reason})");
        }
        let mut label = self.advantage.notation().to_string();
        if let Some(tag) = self.advantage.tag() {
            match &self.advantage_cause {
                Some(cause) => label.push_str(&format!(" [{tag}: {cause}]")),
                None => label.push_str(&format!(" [{tag}]")),
            }
        }
        label.push_str(&signed_term(self.base_modifier));
        if self.exhaustion_level > 0 {
            label.push_str(&format!(
                "{} (exhaustion {})",
                signed_term(self.exhaustion_penalty),
                self.exhaustion_level
            ));
        }
        for bonus in &self.bonus_sources {
            label.push_str(&format!("{} ({})", signed_term(bonus.value), bonus.name));
        }
        label
    }
}

fn signed_term(value: i32) -> String {
    if value < 0 {
        format!(" - {}", -value)
    } else {
        format!(" + {value}")
    }
}

/// Run the deterministic part of a test.
pub fn plan_test(
    ctx: &RollContext,
    situation: &Situation,
    catalog: &Catalog,
    options: &RulesOptions,
) -> Resolved<TestPlan> {
    let mut log = NoticeLog::new();

    let exhaustion = ctx
        .exhaustion_level
        .max(exhaustion_level(&situation.conditions))
        .min(MAX_EXHAUSTION);
    let exhaustion_penalty = -options.exhaustion_penalty_per_level * i32::from(exhaustion);
    let bonus_total: i32 = ctx.bonus_sources.iter().map(|b| b.value).sum();

    let mut plan = TestPlan {
        test: ctx.test,
        auto_fail: auto_fail_reason(ctx, situation),
        advantage: ctx.advantage,
        advantage_cause: (!ctx.advantage.is_normal()).then_some(AdvantageCause::Requested),
        base_modifier: ctx.base_modifier,
        exhaustion_level: exhaustion,
        exhaustion_penalty,
        bonus_sources: ctx.bonus_sources.clone(),
        modifier: ctx.base_modifier + exhaustion_penalty + bonus_total,
    };

    if plan.auto_fail.is_some() {
        plan.advantage = Advantage::Normal;
        plan.advantage_cause = None;
        return log.finish(plan);
    }

    if let Some(skill) = ctx.test.skill() {
        if plan.advantage.is_normal() && situation.proficient_in(skill) {
            if let Some(tool) = synergy_tool(skill, situation, catalog, &mut log) {
                plan.advantage = Advantage::Advantage;
                plan.advantage_cause = Some(AdvantageCause::ToolSynergy { tool });
            }
        }
        if plan.advantage.is_normal() {
            if let Some(pace) = situation.pace {
                if let Some(advantage) = pace.effect_on(skill) {
                    plan.advantage = advantage;
                    plan.advantage_cause = Some(AdvantageCause::TravelPace { pace });
                }
            }
        }
    }

    if ctx.test == TestKind::SavingThrow(Ability::Dexterity)
        && plan.advantage.is_normal()
        && has_condition(&situation.conditions, ConditionKind::Restrained)
    {
        plan.advantage = Advantage::Disadvantage;
        plan.advantage_cause = Some(AdvantageCause::Restrained);
    }

    log.finish(plan)
}

fn auto_fail_reason(ctx: &RollContext, situation: &Situation) -> Option<AutoFailReason> {
    if ctx.auto_fail {
        return Some(AutoFailReason::Forced);
    }
    match ctx.test {
        TestKind::SavingThrow(Ability::Strength | Ability::Dexterity) => {
            save_auto_fail_condition(&situation.conditions).map(AutoFailReason::Condition)
        }
        _ => None,
    }
}

/// Name of the first proficient tool linked to `skill`.
fn synergy_tool(
    skill: Skill,
    situation: &Situation,
    catalog: &Catalog,
    log: &mut NoticeLog,
) -> Option<String> {
    for tool_id in &situation.tool_proficiencies {
        match catalog.tool(tool_id) {
            Some(tool) if tool.skills.contains(&skill) => return Some(tool.name.clone()),
            Some(_) => {}
            None => log.push(Notice::UnknownTool { id: tool_id.clone() }),
        }
    }
    None
}

// ============================================================================
// Outcome
// ============================================================================

/// A test that was rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub test: TestKind,
    /// One die for a normal roll, two otherwise, in throw order.
    pub die_results: Vec<u32>,
    pub chosen: u32,
    pub modifier: i32,
    pub total: i32,
    pub advantage: Advantage,
    pub formula_label: String,
    pub natural_20: bool,
    pub natural_1: bool,
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roll = D20Roll {
            dice: self.die_results.clone(),
            chosen: self.chosen,
        };
        write!(
            f,
            "{}: {} = {}",
            self.formula_label,
            roll.dice_display(),
            self.total
        )
    }
}

/// Result of a d20 test.
///
/// An auto-fail carries no die and is never confused with a rolled total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TestOutcome {
    Rolled(RollOutcome),
    AutoFail {
        test: TestKind,
        reason: AutoFailReason,
        formula_label: String,
    },
}

impl TestOutcome {
    /// Final total; 0 for an auto-fail.
    pub fn total(&self) -> i32 {
        match self {
            TestOutcome::Rolled(roll) => roll.total,
            TestOutcome::AutoFail { .. } => 0,
        }
    }

    pub fn is_auto_fail(&self) -> bool {
        matches!(self, TestOutcome::AutoFail { .. })
    }

    /// Whether the test meets a DC. An auto-fail never does.
    pub fn meets_dc(&self, dc: i32) -> bool {
        match self {
            TestOutcome::Rolled(roll) => roll.total >= dc,
            TestOutcome::AutoFail { .. } => false,
        }
    }

    /// Die values rolled; empty for an auto-fail.
    pub fn die_results(&self) -> &[u32] {
        match self {
            TestOutcome::Rolled(roll) => roll.die_results.as_slice(),
            TestOutcome::AutoFail { .. } => &[],
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TestOutcome::Rolled(roll) => roll.formula_label.as_str(),
            TestOutcome::AutoFail { formula_label, .. } => formula_label.as_str(),
        }
    }

    pub fn rolled(&self) -> Option<&RollOutcome> {
        match self {
            TestOutcome::Rolled(roll) => Some(roll),
            TestOutcome::AutoFail { .. } => None,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Rolled(roll) => write!(f, "{roll}"),
            TestOutcome::AutoFail { formula_label, .. } => write!(f, "{formula_label}"),
        }
    }
}

/// Throw the dice for a plan.
pub fn roll_plan<D: DieRoller + ?Sized>(plan: &TestPlan, roller: &mut D) -> TestOutcome {
    if let Some(reason) = plan.auto_fail {
        tracing::debug!(test = %plan.test, %reason, "test auto-failed");
        return TestOutcome::AutoFail {
            test: plan.test,
            reason,
            formula_label: plan.label(),
        };
    }

    let roll = roll_d20(plan.advantage, roller);
    let total = roll.chosen as i32 + plan.modifier;
    tracing::debug!(
        test = %plan.test,
        advantage = %plan.advantage,
        chosen = roll.chosen,
        modifier = plan.modifier,
        total,
        "test rolled"
    );
    TestOutcome::Rolled(RollOutcome {
        test: plan.test,
        natural_20: roll.natural_20(),
        natural_1: roll.natural_1(),
        chosen: roll.chosen,
        die_results: roll.dice,
        modifier: plan.modifier,
        total,
        advantage: plan.advantage,
        formula_label: plan.label(),
    })
}

/// Plan and roll a test in one step.
pub fn resolve_test<D: DieRoller + ?Sized>(
    ctx: &RollContext,
    situation: &Situation,
    catalog: &Catalog,
    options: &RulesOptions,
    roller: &mut D,
) -> Resolved<TestOutcome> {
    let plan = plan_test(ctx, situation, catalog, options);
    let outcome = roll_plan(&plan.value, roller);
    Resolved::new(outcome, plan.notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srd::srd;
    use crate::testing::ScriptedRoller;
    use proptest::prelude::*;

    fn plan(ctx: &RollContext, situation: &Situation) -> TestPlan {
        plan_test(ctx, situation, srd(), &RulesOptions::default()).value
    }

    fn resolve(
        ctx: &RollContext,
        situation: &Situation,
        roller: &mut ScriptedRoller,
    ) -> TestOutcome {
        resolve_test(ctx, situation, srd(), &RulesOptions::default(), roller).value
    }

    #[test]
    fn test_paralyzed_dex_save_auto_fails() {
        let ctx = RollContext::new(TestKind::SavingThrow(Ability::Dexterity), 9);
        let situation = Situation::new().with_condition(Condition::new(ConditionKind::Paralyzed));
        let mut roller = ScriptedRoller::new([20]);
        let outcome = resolve(&ctx, &situation, &mut roller);

        assert!(outcome.is_auto_fail());
        assert_eq!(outcome.total(), 0);
        assert!(outcome.die_results().is_empty());
        assert!(!outcome.meets_dc(0));
        assert_eq!(outcome.label(), "auto-fail (Paralyzed)");
        assert_eq!(roller.rolls_made(), 0);
    }

    #[test]
    fn test_auto_fail_only_for_str_dex_saves() {
        let situation = Situation::new().with_condition(Condition::new(ConditionKind::Stunned));
        let wis_save = RollContext::new(TestKind::SavingThrow(Ability::Wisdom), 2);
        assert_eq!(plan(&wis_save, &situation).auto_fail, None);

        let dex_check = RollContext::new(TestKind::AbilityCheck(Ability::Dexterity), 2);
        assert_eq!(plan(&dex_check, &situation).auto_fail, None);

        let str_save = RollContext::new(TestKind::SavingThrow(Ability::Strength), 2);
        assert_eq!(
            plan(&str_save, &situation).auto_fail,
            Some(AutoFailReason::Condition(ConditionKind::Stunned))
        );
    }

    #[test]
    fn test_forced_auto_fail() {
        let ctx = RollContext::new(TestKind::AttackRoll, 5).with_auto_fail();
        let mut roller = ScriptedRoller::new([20]);
        let outcome = resolve(&ctx, &Situation::new(), &mut roller);
        assert!(matches!(
            outcome,
            TestOutcome::AutoFail {
                reason: AutoFailReason::Forced,
                ..
            }
        ));
    }

    #[test]
    fn test_rolled_zero_is_not_auto_fail() {
        let ctx = RollContext::new(TestKind::AbilityCheck(Ability::Strength), -1);
        let mut roller = ScriptedRoller::new([1]);
        let outcome = resolve(&ctx, &Situation::new(), &mut roller);
        assert_eq!(outcome.total(), 0);
        assert!(!outcome.is_auto_fail());
        assert!(outcome.meets_dc(0));
        assert!(outcome.rolled().unwrap().natural_1);
    }

    #[test]
    fn test_advantage_and_disadvantage_dice() {
        let base = RollContext::new(TestKind::AttackRoll, 4);

        let mut roller = ScriptedRoller::new([6, 17]);
        let ctx = base.clone().with_advantage(Advantage::Advantage);
        let outcome = resolve(&ctx, &Situation::new(), &mut roller);
        let roll = outcome.rolled().unwrap();
        assert_eq!(roll.die_results, vec![6, 17]);
        assert_eq!(roll.chosen, 17);
        assert_eq!(roll.total, 21);

        let mut roller = ScriptedRoller::new([6, 17]);
        let ctx = base.clone().with_advantage(Advantage::Disadvantage);
        let outcome = resolve(&ctx, &Situation::new(), &mut roller);
        assert_eq!(outcome.rolled().unwrap().chosen, 6);
        assert_eq!(outcome.total(), 10);

        let mut roller = ScriptedRoller::new([6, 17]);
        let outcome = resolve(&base, &Situation::new(), &mut roller);
        assert_eq!(outcome.die_results(), &[6]);
        assert_eq!(roller.rolls_made(), 1);
    }

    #[test]
    fn test_exhaustion_penalty() {
        let ctx = RollContext::new(TestKind::SkillCheck(Skill::Athletics), 5);
        assert_eq!(plan(&ctx, &Situation::new()).modifier, 5);
        assert_eq!(plan(&ctx.clone().with_exhaustion(2), &Situation::new()).modifier, 1);

        // From the condition snapshot; the higher of the two sources wins
        let situation = Situation::new().with_condition(Condition::exhaustion(3));
        assert_eq!(plan(&ctx, &situation).modifier, -1);
        assert_eq!(plan(&ctx.clone().with_exhaustion(1), &situation).exhaustion_level, 3);

        let halved = RulesOptions::default().with_exhaustion_penalty(1);
        let plan = plan_test(&ctx.with_exhaustion(2), &Situation::new(), srd(), &halved).value;
        assert_eq!(plan.modifier, 3);
    }

    #[test]
    fn test_tool_synergy() {
        let ctx = RollContext::new(TestKind::SkillCheck(Skill::SleightOfHand), 4);
        let situation = Situation::new()
            .with_skill(Skill::SleightOfHand, ProficiencyLevel::Proficient)
            .with_tool("thieves_tools");
        let planned = plan(&ctx, &situation);
        assert_eq!(planned.advantage, Advantage::Advantage);
        assert_eq!(
            planned.advantage_cause,
            Some(AdvantageCause::ToolSynergy {
                tool: "Thieves' Tools".into()
            })
        );
        assert_eq!(planned.label(), "2d20kh1 [ADV: tool synergy: Thieves' Tools] + 4");

        // Tool without skill proficiency does nothing
        let untrained = Situation::new().with_tool("Thieves' Tools");
        assert_eq!(plan(&ctx, &untrained).advantage, Advantage::Normal);

        // Never overrides an explicit request
        let requested = ctx.clone().with_advantage(Advantage::Disadvantage);
        let planned = plan(&requested, &situation);
        assert_eq!(planned.advantage, Advantage::Disadvantage);
        assert_eq!(planned.advantage_cause, Some(AdvantageCause::Requested));
    }

    #[test]
    fn test_unknown_tool_notice() {
        let ctx = RollContext::new(TestKind::SkillCheck(Skill::Arcana), 0);
        let situation = Situation::new()
            .with_skill(Skill::Arcana, ProficiencyLevel::Proficient)
            .with_tool("wand_of_tools");
        let planned = plan_test(&ctx, &situation, srd(), &RulesOptions::default());
        assert_eq!(planned.value.advantage, Advantage::Normal);
        assert_eq!(
            planned.notices,
            vec![Notice::UnknownTool {
                id: "wand_of_tools".into()
            }]
        );
    }

    #[test]
    fn test_travel_pace_table() {
        let check = |skill: Skill, pace: TravelPace| {
            plan(
                &RollContext::new(TestKind::SkillCheck(skill), 0),
                &Situation::new().with_pace(pace),
            )
            .advantage
        };
        assert_eq!(check(Skill::Perception, TravelPace::Fast), Advantage::Disadvantage);
        assert_eq!(check(Skill::Survival, TravelPace::Fast), Advantage::Disadvantage);
        assert_eq!(check(Skill::Stealth, TravelPace::Fast), Advantage::Disadvantage);
        assert_eq!(check(Skill::Stealth, TravelPace::Normal), Advantage::Disadvantage);
        assert_eq!(check(Skill::Perception, TravelPace::Normal), Advantage::Normal);
        assert_eq!(check(Skill::Perception, TravelPace::Slow), Advantage::Advantage);
        assert_eq!(check(Skill::Survival, TravelPace::Slow), Advantage::Advantage);
        assert_eq!(check(Skill::Stealth, TravelPace::Slow), Advantage::Normal);
        assert_eq!(check(Skill::Athletics, TravelPace::Fast), Advantage::Normal);
    }

    #[test]
    fn test_tool_synergy_before_pace() {
        let ctx = RollContext::new(TestKind::SkillCheck(Skill::Survival), 3);
        let situation = Situation::new()
            .with_pace(TravelPace::Fast)
            .with_skill(Skill::Survival, ProficiencyLevel::Proficient)
            .with_tool("Navigator's Tools");
        let planned = plan(&ctx, &situation);
        assert_eq!(planned.advantage, Advantage::Advantage);
        assert!(matches!(
            planned.advantage_cause,
            Some(AdvantageCause::ToolSynergy { .. })
        ));
    }

    #[test]
    fn test_pace_leaves_requested_advantage_alone() {
        let stealth = RollContext::new(TestKind::SkillCheck(Skill::Stealth), 2)
            .with_advantage(Advantage::Advantage);
        let planned = plan(&stealth, &Situation::new().with_pace(TravelPace::Fast));
        assert_eq!(planned.advantage, Advantage::Advantage);
        assert_eq!(planned.advantage_cause, Some(AdvantageCause::Requested));

        let perception = RollContext::new(TestKind::SkillCheck(Skill::Perception), 2)
            .with_advantage(Advantage::Disadvantage);
        let planned = plan(&perception, &Situation::new().with_pace(TravelPace::Slow));
        assert_eq!(planned.advantage, Advantage::Disadvantage);
        assert_eq!(planned.advantage_cause, Some(AdvantageCause::Requested));

        let mut roller = ScriptedRoller::new([4, 15]);
        let outcome = resolve(&stealth, &Situation::new().with_pace(TravelPace::Fast), &mut roller);
        assert_eq!(outcome.total(), 17);
        assert_eq!(outcome.label(), "2d20kh1 [ADV: requested] + 2");
    }

    #[test]
    fn test_restrained_dex_save() {
        let situation = Situation::new().with_condition(Condition::new(ConditionKind::Restrained));
        let dex_save = RollContext::new(TestKind::SavingThrow(Ability::Dexterity), 1);
        let planned = plan(&dex_save, &situation);
        assert_eq!(planned.advantage, Advantage::Disadvantage);
        assert_eq!(planned.advantage_cause, Some(AdvantageCause::Restrained));
        assert_eq!(planned.auto_fail, None);

        let requested = dex_save.with_advantage(Advantage::Advantage);
        assert_eq!(plan(&requested, &situation).advantage, Advantage::Advantage);

        let str_save = RollContext::new(TestKind::SavingThrow(Ability::Strength), 1);
        assert_eq!(plan(&str_save, &situation).advantage, Advantage::Normal);
    }

    #[test]
    fn test_label_discloses_adjustments() {
        let ctx = RollContext::new(TestKind::SkillCheck(Skill::Stealth), 3)
            .with_exhaustion(2)
            .with_bonus("Bless", 2)
            .with_bonus("Cover", -1);
        let situation = Situation::new().with_pace(TravelPace::Fast);
        let planned = plan(&ctx, &situation);
        assert_eq!(
            planned.label(),
            "2d20kl1 [DIS: fast pace] + 3 - 4 (exhaustion 2) + 2 (Bless) - 1 (Cover)"
        );
        assert_eq!(planned.modifier, 3 - 4 + 2 - 1);

        let mut roller = ScriptedRoller::new([12, 8]);
        let outcome = roll_plan(&planned, &mut roller);
        assert_eq!(outcome.total(), 8);
        assert_eq!(
            outcome.to_string(),
            "2d20kl1 [DIS: fast pace] + 3 - 4 (exhaustion 2) + 2 (Bless) - 1 (Cover): [(12), 8] = 8"
        );
    }

    #[test]
    fn test_natural_results_and_dc() {
        let ctx = RollContext::new(TestKind::Initiative, 2);
        let mut roller = ScriptedRoller::new([20]);
        let outcome = resolve(&ctx, &Situation::new(), &mut roller);
        let roll = outcome.rolled().unwrap();
        assert!(roll.natural_20);
        assert!(!roll.natural_1);
        assert!(outcome.meets_dc(22));
        assert!(!outcome.meets_dc(23));
    }

    proptest! {
        #[test]
        fn exhaustion_lowers_modifier_by_two_per_level(base in -5i32..15, level in 0u8..=6) {
            let ctx = RollContext::new(TestKind::SavingThrow(Ability::Wisdom), base);
            let fresh = plan(&ctx, &Situation::new());
            let tired = plan(&ctx.clone().with_exhaustion(level), &Situation::new());
            prop_assert_eq!(fresh.modifier - tired.modifier, 2 * i32::from(level));
            prop_assert_eq!(fresh.advantage, tired.advantage);
        }

        #[test]
        fn chosen_die_respects_advantage(d1 in 1u32..=20, d2 in 1u32..=20) {
            let ctx = RollContext::new(TestKind::AttackRoll, 0);
            let mut roller = ScriptedRoller::new([d1, d2]);
            let with_adv = ctx.clone().with_advantage(Advantage::Advantage);
            let adv = resolve(&with_adv, &Situation::new(), &mut roller);
            prop_assert_eq!(adv.rolled().map(|r| r.chosen), Some(d1.max(d2)));

            let mut roller = ScriptedRoller::new([d1, d2]);
            let with_dis = ctx.with_advantage(Advantage::Disadvantage);
            let dis = resolve(&with_dis, &Situation::new(), &mut roller);
            prop_assert_eq!(dis.rolled().map(|r| r.chosen), Some(d1.min(d2)));
        }
    }
}
