//! Actor entity - the host's character or NPC, as seen by this module.
//!
//! The host owns actors. This module only reads the derived values it needs
//! (charisma modifier, proficiency bonus, class levels) and keeps its own
//! data in the actor's namespaced flag region.

use serde::{Deserialize, Serialize};

use crate::game_systems::{max_spell_level, ClassLevels};
use crate::ids::ActorId;
use crate::value_objects::corruption_threshold;

/// Sheet variant of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Npc,
}

impl ActorKind {
    /// Only NPC sheets carry a manner descriptor.
    pub fn has_manner(&self) -> bool {
        matches!(self, Self::Npc)
    }
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

/// Read-only snapshot of a host actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
    #[serde(default)]
    pub charisma_modifier: i32,
    #[serde(default)]
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub classes: Vec<ClassLevels>,
}

impl Actor {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            charisma_modifier: 0,
            proficiency_bonus: 2,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ActorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_abilities(mut self, charisma_modifier: i32, proficiency_bonus: i32) -> Self {
        self.charisma_modifier = charisma_modifier;
        self.proficiency_bonus = proficiency_bonus;
        self
    }

    pub fn with_class(mut self, class: ClassLevels) -> Self {
        self.classes.push(class);
        self
    }

    /// Corruption threshold from the current ability values.
    pub fn corruption_threshold(&self) -> u32 {
        corruption_threshold(self.charisma_modifier, self.proficiency_bonus)
    }

    /// Highest spell level any of the actor's classes grants.
    pub fn max_spell_level(&self) -> u8 {
        max_spell_level(&self.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::SpellProgression;

    #[test]
    fn threshold_uses_charisma_and_double_proficiency() {
        let actor = Actor::new("Ylva", ActorKind::Character).with_abilities(3, 3);
        assert_eq!(actor.corruption_threshold(), 9);
        let weak = Actor::new("Grub", ActorKind::Npc).with_abilities(-5, 0);
        assert_eq!(weak.corruption_threshold(), 2);
    }

    #[test]
    fn max_spell_level_from_classes() {
        let actor = Actor::new("Ylva", ActorKind::Character)
            .with_class(ClassLevels::new("Sorcerer", 5, SpellProgression::Full));
        assert_eq!(actor.max_spell_level(), 3);
    }

    #[test]
    fn only_npcs_have_manner() {
        assert!(ActorKind::Npc.has_manner());
        assert!(!ActorKind::Character.has_manner());
    }

    #[test]
    fn deserializes_with_defaults() {
        let id = ActorId::new();
        let actor: Actor = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Eda",
            "kind": "npc"
        }))
        .unwrap();
        assert_eq!(actor.kind, ActorKind::Npc);
        assert_eq!(actor.charisma_modifier, 0);
        assert!(actor.classes.is_empty());
    }
}
