//! Game system tables used by the corruption subsystem.

pub mod spell_progression;

pub use spell_progression::{
    max_spell_level, ClassLevels, SpellProgression, MAX_CLASS_LEVEL, MAX_SPELL_LEVEL,
};
