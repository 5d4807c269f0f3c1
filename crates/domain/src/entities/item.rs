//! Item entity - the host's item documents. Only spells carry corruption
//! semantics.

use serde::{Deserialize, Serialize};

use crate::game_systems::MAX_SPELL_LEVEL;
use crate::ids::{ActorId, ItemId};

/// Host item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Spell,
    Weapon,
    Equipment,
    Consumable,
    Feat,
    /// Any other host item type.
    #[serde(other)]
    Other,
}

/// Spell level as found in host data.
///
/// Host data sometimes stores the cantrip level as text rather than a number,
/// and numeric levels may arrive as floats (`1.0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSpellLevel {
    Number(serde_json::Number),
    Text(String),
}

impl RawSpellLevel {
    /// Integer level in `0..=9`. Floats are truncated. Text is read by its
    /// leading digits; anything without a number is a cantrip. Out of range
    /// values saturate.
    pub fn normalize(&self) -> u32 {
        let level = match self {
            Self::Number(n) => n
                .as_i64()
                .unwrap_or_else(|| n.as_f64().map_or(0, |f| f as i64)),
            Self::Text(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                if digits.is_empty() {
                    0
                } else {
                    digits.parse().unwrap_or(i64::MAX)
                }
            }
        };
        level.clamp(0, MAX_SPELL_LEVEL as i64) as u32
    }
}

impl Default for RawSpellLevel {
    fn default() -> Self {
        Self::Number(0.into())
    }
}

impl From<u32> for RawSpellLevel {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

/// Read-only snapshot of a host item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub level: RawSpellLevel,
    #[serde(default)]
    pub owner: Option<ActorId>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            level: RawSpellLevel::default(),
            owner: None,
        }
    }

    /// A spell of the given level.
    pub fn spell(name: impl Into<String>, level: u32) -> Self {
        Self::new(name, ItemKind::Spell).with_level(level)
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_level(mut self, level: impl Into<RawSpellLevel>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_owner(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn is_spell(&self) -> bool {
        self.kind == ItemKind::Spell
    }

    /// Normalized spell level (0 = cantrip).
    pub fn spell_level(&self) -> u32 {
        self.level.normalize()
    }
}
