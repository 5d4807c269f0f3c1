//! Spell capability adapter.

use syb5e_domain::{CorruptionCost, Item, ItemFlags, MAX_SPELL_LEVEL};

use super::flags::ModuleFlags;
use crate::infrastructure::ports::RepoError;

/// An item whose casting may cost corruption.
pub trait SpellCostCapable {
    fn item(&self) -> &Item;

    fn is_favored(&self) -> bool;

    /// Cost formula at `level_override`, or at the item's own level.
    ///
    /// `None` for anything that is not a spell. Pure: no I/O, same answer on
    /// every call.
    fn corruption_cost(&self, level_override: Option<u32>) -> Option<CorruptionCost> {
        let item = self.item();
        if !item.is_spell() {
            return None;
        }
        let level = level_override
            .map(|l| l.min(u32::from(MAX_SPELL_LEVEL)))
            .unwrap_or_else(|| item.spell_level());
        Some(CorruptionCost::for_spell(level, self.is_favored()))
    }
}

/// Host item with its favored flag resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellItem {
    item: Item,
    flags: ItemFlags,
}

impl SpellItem {
    pub fn new(item: Item, flags: ItemFlags) -> Self {
        Self { item, flags }
    }

    /// Resolve the item's flags. Non-spells skip the store.
    pub async fn load(item: Item, flags: &ModuleFlags) -> Result<Self, RepoError> {
        let item_flags = if item.is_spell() {
            flags.item_flags(item.id).await?
        } else {
            ItemFlags::default()
        };
        Ok(Self::new(item, item_flags))
    }
}

impl SpellCostCapable for SpellItem {
    fn item(&self) -> &Item {
        &self.item
    }

    fn is_favored(&self) -> bool {
        self.flags.favored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockFlagStore;
    use std::sync::Arc;
    use syb5e_domain::{FlagScope, ItemKind, RawSpellLevel};

    fn spell(level: u32, favored: bool) -> SpellItem {
        SpellItem::new(Item::spell("Test", level), ItemFlags { favored })
    }

    fn formula(item: &SpellItem) -> Option<String> {
        item.corruption_cost(None).map(|c| c.formula())
    }

    #[test]
    fn cost_table() {
        let sword = SpellItem::new(Item::new("Sword", ItemKind::Weapon), ItemFlags::default());
        assert_eq!(formula(&sword), None);
        assert_eq!(formula(&spell(0, true)).as_deref(), Some("0"));
        assert_eq!(formula(&spell(3, true)).as_deref(), Some("3"));
        assert_eq!(formula(&spell(0, false)).as_deref(), Some("1"));
        assert_eq!(formula(&spell(2, false)).as_deref(), Some("1d4 + 2"));
    }

    #[test]
    fn non_spell_is_absent_not_zero() {
        let favored_weapon = SpellItem::new(
            Item::new("Sword", ItemKind::Weapon),
            ItemFlags { favored: true },
        );
        assert!(favored_weapon.corruption_cost(Some(0)).is_none());
        assert!(spell(0, true).corruption_cost(None).is_some());
    }

    #[test]
    fn override_replaces_item_level() {
        let item = spell(1, false);
        assert_eq!(
            item.corruption_cost(Some(4)).map(|c| c.formula()).as_deref(),
            Some("1d4 + 4")
        );
        assert_eq!(
            item.corruption_cost(Some(40)).map(|c| c.formula()).as_deref(),
            Some("1d4 + 9")
        );
    }

    #[test]
    fn text_cantrip_level_is_zero() {
        let mut item = Item::spell("Prestidigitation", 0);
        item.level = RawSpellLevel::Text("cantrip".into());
        let item = SpellItem::new(item, ItemFlags::default());
        assert_eq!(formula(&item).as_deref(), Some("1"));
    }

    #[test]
    fn repeated_queries_agree() {
        let item = spell(5, false);
        let first = item.corruption_cost(None);
        for _ in 0..10 {
            assert_eq!(item.corruption_cost(None), first);
        }
    }

    #[tokio::test]
    async fn load_skips_store_for_non_spells() {
        let mut store = MockFlagStore::new();
        store.expect_get_attribute().never();
        let flags = ModuleFlags::new(Arc::new(store), FlagScope::default());

        let item = SpellItem::load(Item::new("Rope", ItemKind::Equipment), &flags)
            .await
            .unwrap();
        assert!(!item.is_favored());
    }

    #[tokio::test]
    async fn load_reads_favored() {
        let mut store = MockFlagStore::new();
        store
            .expect_get_attribute()
            .times(1)
            .returning(|_, _| Ok(Some(serde_json::json!({"favored": true}))));
        let flags = ModuleFlags::new(Arc::new(store), FlagScope::default());

        let item = SpellItem::load(Item::spell("Bolt", 1), &flags).await.unwrap();
        assert!(item.is_favored());
        assert_eq!(
            item.corruption_cost(None).map(|c| c.formula()).as_deref(),
            Some("1")
        );
    }
}
