//! Corruption value objects.
//!
//! Corruption is a numeric resource made of a temporary and a permanent part.
//! The total (`value`) is derived on read and never persisted.

use serde::{Deserialize, Serialize};

/// Floor of the corruption threshold.
pub const MIN_CORRUPTION_THRESHOLD: u32 = 2;

/// Persisted corruption fields for one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionState {
    pub temp: u32,
    pub permanent: u32,
    pub max: u32,
}

impl CorruptionState {
    pub fn new(temp: u32, permanent: u32, max: u32) -> Self {
        Self {
            temp,
            permanent,
            max,
        }
    }

    /// Total corruption: `temp + permanent`.
    pub fn value(&self) -> u32 {
        self.temp.saturating_add(self.permanent)
    }

    /// Whether the total has reached the threshold.
    pub fn at_threshold(&self) -> bool {
        self.value() >= self.max
    }

    /// Apply a partial update; omitted fields are preserved.
    pub fn apply(&self, patch: &CorruptionPatch) -> Self {
        Self {
            temp: patch.temp.unwrap_or(self.temp),
            permanent: patch.permanent.unwrap_or(self.permanent),
            max: patch.max.unwrap_or(self.max),
        }
    }

    /// Snapshot including the derived total, for presentation.
    pub fn view(&self) -> CorruptionView {
        CorruptionView {
            temp: self.temp,
            permanent: self.permanent,
            max: self.max,
            value: self.value(),
        }
    }
}

/// Partial corruption update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorruptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl CorruptionPatch {
    pub fn temp(temp: u32) -> Self {
        Self {
            temp: Some(temp),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.temp.is_none() && self.permanent.is_none() && self.max.is_none()
    }
}

/// Read-only corruption projection with the derived total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionView {
    pub temp: u32,
    pub permanent: u32,
    pub max: u32,
    pub value: u32,
}

/// Corruption threshold: `max(charisma_modifier + proficiency_bonus * 2, 2)`.
pub fn corruption_threshold(charisma_modifier: i32, proficiency_bonus: i32) -> u32 {
    let raw = charisma_modifier.saturating_add(proficiency_bonus.saturating_mul(2));
    u32::try_from(raw)
        .unwrap_or(0)
        .max(MIN_CORRUPTION_THRESHOLD)
}
