//! Symbaroum 5e corruption engine library.
//!
//! Corruption state, actor initialization, and spell casting costs layered
//! over a tabletop host's documents.
//!
//! ## Structure
//!
//! - `entities/` - Capability adapters over host actors and items
//! - `use_cases/` - State, initialization, casting and sheet orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - Host hook entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end tests against the in-memory host.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
