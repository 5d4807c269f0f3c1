//! Spell progression tables.
//!
//! Maps a class's progression tier and level to the highest spell level the
//! class grants. Used only for display (the casting dialog's level list).

use serde::{Deserialize, Serialize};

/// Highest spell level in the game.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Highest class level covered by the tables.
pub const MAX_CLASS_LEVEL: u8 = 20;

// Index is class level (0..=20).
const FULL: [u8; 21] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 9, 9];
const HALF: [u8; 21] = [0, 0, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5];
const THIRD: [u8; 21] = [0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4];
const PACT: [u8; 21] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];
const ARTIFICER: [u8; 21] = [0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5];

/// Spellcasting progression tier of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellProgression {
    #[default]
    None,
    Full,
    Half,
    Third,
    Pact,
    Artificer,
}

impl SpellProgression {
    /// Highest spell level granted at `class_level`. Levels past the table
    /// use the last row.
    pub fn max_spell_level(&self, class_level: u8) -> u8 {
        let table = match self {
            Self::None => return 0,
            Self::Full => &FULL,
            Self::Half => &HALF,
            Self::Third => &THIRD,
            Self::Pact => &PACT,
            Self::Artificer => &ARTIFICER,
        };
        table[class_level.min(MAX_CLASS_LEVEL) as usize]
    }
}

/// One class an actor has levels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevels {
    pub name: String,
    pub levels: u8,
    #[serde(default)]
    pub progression: SpellProgression,
}

impl ClassLevels {
    pub fn new(name: impl Into<String>, levels: u8, progression: SpellProgression) -> Self {
        Self {
            name: name.into(),
            levels,
            progression,
        }
    }
}

/// Highest spell level granted by any of the classes. Not a multiclass slot
/// calculation; the value is only shown, never enforced.
pub fn max_spell_level(classes: &[ClassLevels]) -> u8 {
    classes
        .iter()
        .map(|cls| cls.progression.max_spell_level(cls.levels))
        .max()
        .unwrap_or(0)
}
