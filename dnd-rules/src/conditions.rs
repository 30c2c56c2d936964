//! Conditions as a read-only snapshot.
//!
//! The live session owns condition instances and attaches/detaches them each
//! round. Everything here only reads a slice of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest exhaustion level; a creature dies at this level.
pub const MAX_EXHAUSTION: u8 = 6;

/// Conditions that make Strength and Dexterity saving throws fail outright.
pub const SAVE_AUTO_FAIL_CONDITIONS: [ConditionKind; 4] = [
    ConditionKind::Paralyzed,
    ConditionKind::Stunned,
    ConditionKind::Unconscious,
    ConditionKind::Petrified,
];

/// D&D 5e conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Blinded,
    Charmed,
    Deafened,
    Exhaustion,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::Blinded => "Blinded",
            ConditionKind::Charmed => "Charmed",
            ConditionKind::Deafened => "Deafened",
            ConditionKind::Exhaustion => "Exhaustion",
            ConditionKind::Frightened => "Frightened",
            ConditionKind::Grappled => "Grappled",
            ConditionKind::Incapacitated => "Incapacitated",
            ConditionKind::Invisible => "Invisible",
            ConditionKind::Paralyzed => "Paralyzed",
            ConditionKind::Petrified => "Petrified",
            ConditionKind::Poisoned => "Poisoned",
            ConditionKind::Prone => "Prone",
            ConditionKind::Restrained => "Restrained",
            ConditionKind::Stunned => "Stunned",
            ConditionKind::Unconscious => "Unconscious",
        }
    }

    /// Whether this condition forces Strength and Dexterity saves to fail.
    pub fn auto_fails_str_dex_saves(&self) -> bool {
        SAVE_AUTO_FAIL_CONDITIONS.contains(self)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How long a condition lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDuration {
    Rounds(u32),
    #[default]
    Permanent,
}

/// A condition applied to a creature with tracking info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    /// Stacking value, used by exhaustion (levels 0-6).
    #[serde(default)]
    pub value: Option<u8>,
    #[serde(default)]
    pub duration: ConditionDuration,
    #[serde(default)]
    pub source: String,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            value: None,
            duration: ConditionDuration::Permanent,
            source: String::new(),
        }
    }

    pub fn exhaustion(level: u8) -> Self {
        Self {
            value: Some(level),
            ..Self::new(ConditionKind::Exhaustion)
        }
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = ConditionDuration::Rounds(rounds);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.value) {
            (ConditionKind::Exhaustion, Some(level)) => write!(f, "Exhaustion ({level})"),
            _ => write!(f, "{}", self.kind.name()),
        }
    }
}

/// Check if any instance of `kind` is present.
pub fn has_condition(conditions: &[Condition], kind: ConditionKind) -> bool {
    conditions.iter().any(|c| c.kind == kind)
}

/// The first condition in the snapshot that auto-fails Strength/Dexterity saves.
pub fn save_auto_fail_condition(conditions: &[Condition]) -> Option<ConditionKind> {
    conditions
        .iter()
        .map(|c| c.kind)
        .find(ConditionKind::auto_fails_str_dex_saves)
}

/// Effective exhaustion level: the highest value among exhaustion instances,
/// capped at [`MAX_EXHAUSTION`]. Instances without a value count as level 1.
pub fn exhaustion_level(conditions: &[Condition]) -> u8 {
    conditions
        .iter()
        .filter(|c| c.kind == ConditionKind::Exhaustion)
        .map(|c| c.value.unwrap_or(1))
        .max()
        .unwrap_or(0)
        .min(MAX_EXHAUSTION)
}

/// Collapse duplicate instances so each kind appears once.
///
/// Nothing in the engine calls this on its own; callers use it when they want
/// merged state. The highest value and the longest duration win, and the
/// first instance's source is kept.
pub fn collapse_duplicates(conditions: &[Condition]) -> Vec<Condition> {
    let mut collapsed: Vec<Condition> = Vec::new();
    for condition in conditions {
        match collapsed.iter_mut().find(|c| c.kind == condition.kind) {
            Some(existing) => {
                existing.value = existing.value.max(condition.value);
                existing.duration = match (existing.duration, condition.duration) {
                    (ConditionDuration::Permanent, _) | (_, ConditionDuration::Permanent) => {
                        ConditionDuration::Permanent
                    }
                    (ConditionDuration::Rounds(a), ConditionDuration::Rounds(b)) => {
                        ConditionDuration::Rounds(a.max(b))
                    }
                };
            }
            None => collapsed.push(condition.clone()),
        }
    }
    collapsed
}
