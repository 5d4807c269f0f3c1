//! Corruption cost of casting a spell.
//!
//! A cantrip causes 1 point of temporary corruption, a leveled spell 1d4 plus
//! its level. Favored cantrips cost nothing and favored leveled spells cost
//! exactly their level.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dice::DiceFormula;

/// Die added to the level of a non-favored leveled spell.
pub const LEVELED_SPELL_DIE: u8 = 4;

/// Cost formula for one casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CorruptionCost {
    /// A fixed amount, rendered as a plain number ("0", "1", "<level>").
    Flat { amount: u32 },
    /// `1d4 + <level>`
    Rolled { level: u32 },
}

impl CorruptionCost {
    /// Cost of a spell at `level` (0 = cantrip).
    pub fn for_spell(level: u32, favored: bool) -> Self {
        match (favored, level) {
            (true, 0) => Self::Flat { amount: 0 },
            (true, level) => Self::Flat { amount: level },
            (false, 0) => Self::Flat { amount: 1 },
            (false, level) => Self::Rolled { level },
        }
    }

    /// The formula string handed to the formula evaluator.
    pub fn formula(&self) -> String {
        self.to_string()
    }

    /// Parsed form of [`Self::formula`].
    pub fn dice(&self) -> DiceFormula {
        match *self {
            Self::Flat { amount } => DiceFormula::flat(amount as i32),
            Self::Rolled { level } => DiceFormula {
                dice_count: 1,
                die_size: LEVELED_SPELL_DIE,
                modifier: level as i32,
            },
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Self::Flat { amount: 0 })
    }
}

impl fmt::Display for CorruptionCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat { amount } => write!(f, "{}", amount),
            Self::Rolled { level } => write!(f, "1d{} + {}", LEVELED_SPELL_DIE, level),
        }
    }
}

/// A cost after rolling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingCost {
    pub formula: String,
    pub amount: u32,
}
