//! Host entities as seen by the corruption subsystem.

mod actor;
mod item;

pub use actor::{Actor, ActorKind};
pub use item::{Item, ItemKind, RawSpellLevel};
