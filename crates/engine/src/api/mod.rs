//! API layer - host hook entry points.

pub mod hooks;

pub use hooks::{HookBus, HookError, HookRequest, HookResponse};
