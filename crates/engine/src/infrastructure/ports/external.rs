//! External service ports (formula evaluation, event publication) and the
//! clock/random seams the in-process adapters draw from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use syb5e_domain::DomainEvent;

use super::error::RollError;

/// The host's random-formula evaluator.
///
/// Understands plain integers and `NdM + K` dice notation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormulaRoller: Send + Sync {
    async fn roll(&self, formula: &str) -> Result<i64, RollError>;
}

/// Best-effort publication of domain events.
///
/// Publishing never fails the operation that produced the event.
#[cfg_attr(test, mockall::automock)]
pub trait EventBusPort: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

/// Timestamps for event envelopes.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Die faces for the in-process formula roller.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}
