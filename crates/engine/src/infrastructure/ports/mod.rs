//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Host documents and their persisted attributes (the host's document store)
//! - The host's formula evaluator
//! - Event publication
//! - Clock/Random

mod error;
mod external;
mod repos;

// =============================================================================
// Host Document Ports
// =============================================================================
pub use repos::{ActorRepo, AttributeUpdates, FlagStore, ItemRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{ClockPort, EventBusPort, FormulaRoller, RandomPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockActorRepo, MockFlagStore, MockItemRepo};

#[cfg(test)]
pub use external::{MockClockPort, MockEventBusPort, MockFormulaRoller, MockRandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RepoError, RollError};
