//! Typed schema for the namespaced flag regions this module owns.
//!
//! Actors and items each carry a flag region under `flags.<scope>`. The host
//! stores it as loose JSON; every read goes through a single decode step that
//! fills absent or malformed fields with defaults and reports what it had to
//! repair.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::corruption::CorruptionState;
use crate::common::{get_path, remove_path, set_path};
use crate::error::DomainError;

/// Namespace used when none is configured.
pub const DEFAULT_FLAG_SCOPE: &str = "symbaroum5ecore";

/// Current version of the actor flag schema.
pub const ACTOR_FLAGS_VERSION: u32 = 1;

/// Keys inside the namespaced region.
pub mod keys {
    pub const SCHEMA_VERSION: &str = "schemaVersion";
    pub const INITIALIZED: &str = "initialized";
    pub const CORRUPTION: &str = "corruption";
    pub const TEMP: &str = "temp";
    pub const PERMANENT: &str = "permanent";
    pub const MAX: &str = "max";
    pub const MANNER: &str = "manner";
    pub const SHADOW: &str = "shadow";
    pub const FAVORED: &str = "favored";
}

/// The flag namespace (module name) under a document's `flags` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct FlagScope(String);

impl FlagScope {
    pub fn new(scope: impl Into<String>) -> Result<Self, DomainError> {
        let scope = scope.into();
        if scope.trim().is_empty() {
            return Err(DomainError::validation("Flag scope cannot be empty"));
        }
        if scope.contains('.') {
            return Err(DomainError::validation(format!(
                "Flag scope cannot contain '.': {}",
                scope
            )));
        }
        Ok(Self(scope))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dotted path of the whole region, e.g. `flags.symbaroum5ecore`.
    pub fn root(&self) -> String {
        format!("flags.{}", self.0)
    }

    /// Dotted path of a key inside the region.
    pub fn path(&self, key: &str) -> String {
        format!("flags.{}.{}", self.0, key)
    }
}

impl TryFrom<String> for FlagScope {
    type Error = DomainError;

    fn try_from(scope: String) -> Result<Self, Self::Error> {
        Self::new(scope)
    }
}

impl Default for FlagScope {
    fn default() -> Self {
        Self(DEFAULT_FLAG_SCOPE.to_string())
    }
}

impl std::fmt::Display for FlagScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted locations of the corruption fields. `value` has no path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionPaths {
    pub temp: String,
    pub permanent: String,
    pub max: String,
}

/// Path table handed to the sheet renderer so form fields bind directly to
/// their persisted locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPaths {
    pub root: String,
    pub initialized: String,
    pub corruption: CorruptionPaths,
    pub manner: String,
    pub shadow: String,
    /// Item-level
    pub favored: String,
}

impl FlagPaths {
    pub fn for_scope(scope: &FlagScope) -> Self {
        let corruption = |key: &str| scope.path(&format!("{}.{}", keys::CORRUPTION, key));
        Self {
            root: scope.root(),
            initialized: scope.path(keys::INITIALIZED),
            corruption: CorruptionPaths {
                temp: corruption(keys::TEMP),
                permanent: corruption(keys::PERMANENT),
                max: corruption(keys::MAX),
            },
            manner: scope.path(keys::MANNER),
            shadow: scope.path(keys::SHADOW),
            favored: scope.path(keys::FAVORED),
        }
    }
}

/// Result of decoding a flag region with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    /// Fields that were present but malformed and fell back to defaults.
    pub issues: Vec<DomainError>,
}

/// Actor flag region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorFlags {
    /// 0 for regions written before the schema was versioned.
    pub schema_version: u32,
    pub initialized: bool,
    pub corruption: CorruptionState,
    pub manner: String,
    pub shadow: String,
}

impl ActorFlags {
    /// Fresh defaults with the given corruption threshold.
    pub fn defaults(max_corruption: u32) -> Self {
        Self {
            schema_version: ACTOR_FLAGS_VERSION,
            initialized: true,
            corruption: CorruptionState::new(0, 0, max_corruption),
            manner: String::new(),
            shadow: String::new(),
        }
    }

    /// Written by a newer schema than this build understands. Such regions
    /// still decode field by field; unknown fields are left alone.
    pub fn is_from_newer_schema(&self) -> bool {
        self.schema_version > ACTOR_FLAGS_VERSION
    }

    /// Decode a stored region, tolerating absence and malformed fields.
    pub fn decode(region: Option<&Value>, root: &str) -> Decoded<Self> {
        let mut issues = Vec::new();
        let Some(obj) = object_or_report(region, root, &mut issues) else {
            return Decoded {
                value: Self::default(),
                issues,
            };
        };

        let corruption_path = format!("{}.{}", root, keys::CORRUPTION);
        let corruption = match object_or_report(obj.get(keys::CORRUPTION), &corruption_path, &mut issues)
        {
            Some(c) => CorruptionState {
                temp: field(c, keys::TEMP, &corruption_path, &mut issues),
                permanent: field(c, keys::PERMANENT, &corruption_path, &mut issues),
                max: field(c, keys::MAX, &corruption_path, &mut issues),
            },
            None => CorruptionState::default(),
        };

        Decoded {
            value: Self {
                schema_version: field(obj, keys::SCHEMA_VERSION, root, &mut issues),
                initialized: field(obj, keys::INITIALIZED, root, &mut issues),
                corruption,
                manner: field(obj, keys::MANNER, root, &mut issues),
                shadow: field(obj, keys::SHADOW, root, &mut issues),
            },
            issues,
        }
    }

    /// The stored region with malformed fields removed, so that a
    /// defaults merge can fill them. Always an object.
    pub fn sanitized_region(region: Option<&Value>, root: &str) -> Decoded<Value> {
        let issues = Self::decode(region, root).issues;
        let mut doc = Value::Object(Map::new());
        if let Some(region) = region {
            set_path(&mut doc, root, region.clone());
        }
        for issue in &issues {
            if let DomainError::InvalidFlagData { path, .. } = issue {
                remove_path(&mut doc, path);
            }
        }
        let value = match get_path(&doc, root) {
            Some(v @ Value::Object(_)) => v.clone(),
            _ => Value::Object(Map::new()),
        };
        Decoded { value, issues }
    }

    /// JSON form written back into the namespaced region.
    pub fn to_value(&self) -> Value {
        let mut corruption = Map::new();
        corruption.insert(keys::TEMP.into(), json!(self.corruption.temp));
        corruption.insert(keys::PERMANENT.into(), json!(self.corruption.permanent));
        corruption.insert(keys::MAX.into(), json!(self.corruption.max));

        let mut region = Map::new();
        region.insert(keys::SCHEMA_VERSION.into(), json!(self.schema_version));
        region.insert(keys::INITIALIZED.into(), json!(self.initialized));
        region.insert(keys::CORRUPTION.into(), Value::Object(corruption));
        region.insert(keys::MANNER.into(), json!(self.manner));
        region.insert(keys::SHADOW.into(), json!(self.shadow));
        Value::Object(region)
    }
}

/// Item flag region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFlags {
    pub favored: bool,
}

impl ItemFlags {
    pub fn decode(region: Option<&Value>, root: &str) -> Decoded<Self> {
        let mut issues = Vec::new();
        let favored = object_or_report(region, root, &mut issues)
            .map(|obj| field(obj, keys::FAVORED, root, &mut issues))
            .unwrap_or_default();
        Decoded {
            value: Self { favored },
            issues,
        }
    }
}

/// `Some(map)` for an object, `None` for absent/null; reports any other shape.
fn object_or_report<'a>(
    value: Option<&'a Value>,
    path: &str,
    issues: &mut Vec<DomainError>,
) -> Option<&'a Map<String, Value>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            issues.push(DomainError::invalid_flag_data(
                path,
                format!("expected an object, found {}", other),
            ));
            None
        }
    }
}

fn field<T: DeserializeOwned + Default>(
    obj: &Map<String, Value>,
    key: &str,
    parent: &str,
    issues: &mut Vec<DomainError>,
) -> T {
    match obj.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            issues.push(DomainError::invalid_flag_data(format!("{}.{}", parent, key), e));
            T::default()
        }),
    }
}
