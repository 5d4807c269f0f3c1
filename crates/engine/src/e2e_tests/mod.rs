//! End-to-end tests.
//!
//! Drive the complete App through the hook bus against the in-memory host,
//! the way the host itself calls in.

mod e2e_helpers;

pub use e2e_helpers::*;
