//! Casting dialog data.
//!
//! Spell slots are replaced by corruption: every level up to the caster's
//! maximum is castable, and the "consume slot" checkbox becomes "gain
//! corruption".

use serde::{Deserialize, Serialize};
use syb5e_domain::Actor;

use crate::entities::{SpellCostCapable, SpellItem};

/// Text placed next to the consume checkbox.
pub const CONSUME_PROMPT: &str = "Gain Corruption?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellLevelOption {
    pub level: u32,
    pub label: String,
    pub can_cast: bool,
    pub has_slots: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingDialogData {
    pub spell_levels: Vec<SpellLevelOption>,
    pub errors: Vec<String>,
    pub consume_spell_slot: bool,
    pub can_use: bool,
}

/// "1st Level", "2nd Level", ...
pub fn level_label(level: u32) -> String {
    let suffix = match (level % 10, level % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{level}{suffix} Level")
}

/// Dialog options for casting `item` as `caster`: one per level from 1 to
/// the caster's max spell level, each labeled with its cost.
///
/// `None` for non-spells.
pub fn casting_dialog_data(caster: &Actor, item: &SpellItem) -> Option<CastingDialogData> {
    item.corruption_cost(None)?;

    let max_level = u32::from(caster.max_spell_level());
    let spell_levels = (1..=max_level)
        .filter_map(|level| {
            let cost = item.corruption_cost(Some(level))?;
            Some(SpellLevelOption {
                level,
                label: format!("{} ({})", level_label(level), cost),
                can_cast: true,
                has_slots: true,
            })
        })
        .collect();

    Some(CastingDialogData {
        spell_levels,
        errors: Vec::new(),
        consume_spell_slot: true,
        can_use: true,
    })
}

/// Replace the text beside the consume checkbox.
///
/// Expects exactly one text node. Anything else is logged and the first
/// node, if any, is still replaced. Returns whether the structure matched.
pub fn relabel_consume_prompt(text_nodes: &mut [String]) -> bool {
    let matched = text_nodes.len() == 1;
    if !matched {
        tracing::warn!(
            text_nodes = text_nodes.len(),
            "Unexpected casting dialog structure near the consume checkbox"
        );
    }
    if let Some(first) = text_nodes.first_mut() {
        *first = CONSUME_PROMPT.to_string();
    }
    matched
}
