//! Symbaroum 5e domain: the corruption resource and the corruption cost of
//! casting spells.
//!
//! Everything here is pure and synchronous. Host documents are read-only
//! snapshots, persisted data goes through the typed flag schema, and dice
//! randomness is injected by the caller.

pub mod common;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use entities::{Actor, ActorKind, Item, ItemKind, RawSpellLevel};
pub use error::DomainError;
pub use events::DomainEvent;
pub use game_systems::{max_spell_level, ClassLevels, SpellProgression, MAX_SPELL_LEVEL};
pub use ids::{ActorId, DocumentRef, ItemId};
pub use value_objects::{
    corruption_threshold, keys, ActorFlags, CastingCost, CorruptionCost, CorruptionPatch,
    CorruptionPaths, CorruptionState, CorruptionView, Decoded, DiceFormula, DiceParseError,
    DiceRollResult, FlagPaths, FlagScope, ItemFlags, ACTOR_FLAGS_VERSION, DEFAULT_FLAG_SCOPE,
    MIN_CORRUPTION_THRESHOLD,
};
