//! Entity modules - Domain capability encapsulation.
//!
//! Capability adapters wrap host documents with this module's data. They
//! depend on the flag store port and provide the building blocks for use cases.

pub mod actor;
pub mod flags;
pub mod spell;

pub use actor::{CorruptionActor, CorruptionCapable};
pub use flags::ModuleFlags;
pub use spell::{SpellCostCapable, SpellItem};
