//! d20 rolling with advantage/disadvantage.
//!
//! Raw randomness comes from a [`DieRoller`]; this module only decides how
//! many dice are thrown and which one is kept.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces on the die every test is made with.
pub const D20: u32 = 20;

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Short tag used in formula labels.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Advantage::Normal => None,
            Advantage::Advantage => Some("ADV"),
            Advantage::Disadvantage => Some("DIS"),
        }
    }

    /// Dice notation for the d20 part of the roll.
    pub fn notation(&self) -> &'static str {
        match self {
            Advantage::Normal => "1d20",
            Advantage::Advantage => "2d20kh1",
            Advantage::Disadvantage => "2d20kl1",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Advantage::Normal)
    }
}

impl fmt::Display for Advantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advantage::Normal => write!(f, "normal"),
            Advantage::Advantage => write!(f, "advantage"),
            Advantage::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// Source of uniform die results in `[1, faces]`.
pub trait DieRoller {
    fn roll_die(&mut self, faces: u32) -> u32;
}

/// A [`DieRoller`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngRoller<R> {
    rng: R,
}

impl<R: Rng> RngRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRoller<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RngRoller<StdRng> {
    /// Reproducible roller (useful for testing).
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DieRoller for RngRoller<R> {
    fn roll_die(&mut self, faces: u32) -> u32 {
        self.rng.gen_range(1..=faces.max(1))
    }
}

/// Raw result of the d20 part of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    /// Every die thrown, in throw order: one for a normal roll, two otherwise.
    pub dice: Vec<u32>,
    pub chosen: u32,
}

impl D20Roll {
    pub fn natural_20(&self) -> bool {
        self.chosen == D20
    }

    pub fn natural_1(&self) -> bool {
        self.chosen == 1
    }

    /// Format the dice for display, dropped die in parentheses.
    pub fn dice_display(&self) -> String {
        let mut chosen_shown = false;
        let shown: Vec<String> = self
            .dice
            .iter()
            .map(|&die| {
                if die == self.chosen && !chosen_shown {
                    chosen_shown = true;
                    die.to_string()
                } else {
                    format!("({die})")
                }
            })
            .collect();
        format!("[{}]", shown.join(", "))
    }
}

/// Roll the d20 part of a test.
///
/// Out-of-range values from the roller are clamped into `[1, 20]`.
pub fn roll_d20<D: DieRoller + ?Sized>(advantage: Advantage, roller: &mut D) -> D20Roll {
    let mut throw = || roller.roll_die(D20).clamp(1, D20);
    match advantage {
        Advantage::Normal => {
            let roll = throw();
            D20Roll {
                dice: vec![roll],
                chosen: roll,
            }
        }
        Advantage::Advantage | Advantage::Disadvantage => {
            let roll1 = throw();
            let roll2 = throw();
            let chosen = if advantage == Advantage::Advantage {
                roll1.max(roll2)
            } else {
                roll1.min(roll2)
            };
            D20Roll {
                dice: vec![roll1, roll2],
                chosen,
            }
        }
    }
}
