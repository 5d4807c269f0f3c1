//! Module settings loaded from the environment.

use serde::{Deserialize, Serialize};
use syb5e_domain::{ActorKind, DomainError, FlagScope};

use super::event_bus::DEFAULT_EVENT_CAPACITY;

pub const ENV_FLAG_SCOPE: &str = "SYB5E_FLAG_SCOPE";
pub const ENV_SERIALIZE_CASTS: &str = "SYB5E_SERIALIZE_CASTS";
pub const ENV_EVENT_CAPACITY: &str = "SYB5E_EVENT_CAPACITY";
pub const ENV_CHARACTER_SHEET: &str = "SYB5E_CHARACTER_SHEET";
pub const ENV_NPC_SHEET: &str = "SYB5E_NPC_SHEET";

pub const DEFAULT_CHARACTER_SHEET: &str = "dnd5e.Syb5eActorSheetCharacter";
pub const DEFAULT_NPC_SHEET: &str = "dnd5e.Syb5eActorSheetNPC";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid {var}: {source}")]
    InvalidScope {
        var: &'static str,
        #[source]
        source: DomainError,
    },
    #[error("Invalid {var}: '{value}' is not {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Sheet ids registered with the host, one per actor kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetIds {
    pub character: String,
    pub npc: String,
}

impl SheetIds {
    pub fn for_kind(&self, kind: ActorKind) -> &str {
        match kind {
            ActorKind::Character => &self.character,
            ActorKind::Npc => &self.npc,
        }
    }
}

impl Default for SheetIds {
    fn default() -> Self {
        Self {
            character: DEFAULT_CHARACTER_SHEET.to_string(),
            npc: DEFAULT_NPC_SHEET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSettings {
    /// Namespace under each document's `flags` record.
    pub flag_scope: FlagScope,
    /// Route casts through the per-actor lock (`cast_and_apply`).
    pub serialize_casts: bool,
    pub event_capacity: usize,
    pub sheets: SheetIds,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            flag_scope: FlagScope::default(),
            serialize_casts: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            sheets: SheetIds::default(),
        }
    }
}

impl ModuleSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; absent keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let flag_scope = match lookup(ENV_FLAG_SCOPE) {
            Some(scope) => FlagScope::new(scope).map_err(|source| SettingsError::InvalidScope {
                var: ENV_FLAG_SCOPE,
                source,
            })?,
            None => defaults.flag_scope,
        };

        let serialize_casts = match lookup(ENV_SERIALIZE_CASTS) {
            Some(raw) => parse_bool(&raw).ok_or(SettingsError::InvalidValue {
                var: ENV_SERIALIZE_CASTS,
                value: raw,
                expected: "a boolean",
            })?,
            None => defaults.serialize_casts,
        };

        let event_capacity = match lookup(ENV_EVENT_CAPACITY) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        var: ENV_EVENT_CAPACITY,
                        value: raw,
                        expected: "a positive integer",
                    })
                }
            },
            None => defaults.event_capacity,
        };

        let sheets = SheetIds {
            character: lookup(ENV_CHARACTER_SHEET).unwrap_or(defaults.sheets.character),
            npc: lookup(ENV_NPC_SHEET).unwrap_or(defaults.sheets.npc),
        };

        Ok(Self {
            flag_scope,
            serialize_casts,
            event_capacity,
            sheets,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
