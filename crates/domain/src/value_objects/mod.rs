//! Value objects for the corruption subsystem.

mod casting_cost;
mod corruption;
mod dice;
mod module_flags;

pub use casting_cost::{CastingCost, CorruptionCost, LEVELED_SPELL_DIE};
pub use corruption::{
    corruption_threshold, CorruptionPatch, CorruptionState, CorruptionView,
    MIN_CORRUPTION_THRESHOLD,
};
pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use module_flags::{
    keys, ActorFlags, CorruptionPaths, Decoded, FlagPaths, FlagScope, ItemFlags,
    ACTOR_FLAGS_VERSION, DEFAULT_FLAG_SCOPE,
};
