//! E2E test helpers for constructing the full application stack.
//!
//! Wires a real App against the in-memory host with a fixed clock and fixed
//! dice, and seeds a small party.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use syb5e_domain::common::set_path;
use syb5e_domain::{
    Actor, ActorId, ActorKind, ClassLevels, DocumentRef, Item, ItemId, ItemKind, SpellProgression,
};

use crate::api::hooks::{HookBus, PreUpdateActor, PreUpdateActorResult, SHEET_CLASS_PATH};
use crate::app::App;
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::event_bus::InProcessEventBus;
use crate::infrastructure::memory::InMemoryHost;
use crate::infrastructure::settings::ModuleSettings;

pub const TEMP_PATH: &str = "flags.symbaroum5ecore.corruption.temp";

/// Seeded host plus the App built on it.
pub struct E2EWorld {
    pub host: Arc<InMemoryHost>,
    pub app: Arc<App>,
    pub hooks: Arc<HookBus>,
    pub bus: Arc<InProcessEventBus>,
    /// Wizard 5, cha +3, prof +3: threshold 9
    pub ylva: ActorId,
    /// NPC with no spellcasting
    pub goblin: ActorId,
    /// Ylva's level 1 spell, not favored
    pub witch_bolt: ItemId,
    /// Ylva's favored cantrip
    pub light: ItemId,
    /// Ylva's rope
    pub rope: ItemId,
}

impl E2EWorld {
    /// Every die rolls `die_result`.
    pub fn new(settings: ModuleSettings, die_result: i32) -> Self {
        let host = Arc::new(InMemoryHost::new());

        let ylva = Actor::new("Ylva", ActorKind::Character)
            .with_abilities(3, 3)
            .with_class(ClassLevels::new("Wizard", 5, SpellProgression::Full));
        let goblin = Actor::new("Goblin", ActorKind::Npc).with_abilities(-1, 2);

        let witch_bolt = Item::spell("Witch Bolt", 1).with_owner(ylva.id);
        let light = Item::spell("Light", 0).with_owner(ylva.id);
        let rope = Item::new("Rope", ItemKind::Equipment).with_owner(ylva.id);

        let ids = (ylva.id, goblin.id, witch_bolt.id, light.id, rope.id);
        host.insert_actor(ylva);
        host.insert_actor_with_flags(goblin, json!({"symbaroum5ecore": {"manner": "sly"}}));
        host.insert_item(witch_bolt);
        host.insert_item_with_flags(light, json!({"symbaroum5ecore": {"favored": true}}));
        host.insert_item(rope);

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let (app, bus) = App::in_memory_with(
            settings,
            host.clone(),
            Arc::new(FixedClock(now)),
            Arc::new(FixedRandom(die_result)),
        );
        let app = Arc::new(app);

        Self {
            host,
            hooks: Arc::new(HookBus::new(app.clone())),
            app,
            bus,
            ylva: ids.0,
            goblin: ids.1,
            witch_bolt: ids.2,
            light: ids.3,
            rope: ids.4,
        }
    }

    /// Assign a sheet the way the host does: run the pre-update hook, then
    /// commit the (possibly augmented) update.
    pub async fn assign_sheet(&self, actor_id: ActorId, sheet: &str) -> PreUpdateActorResult {
        let mut pending_update = json!({});
        set_path(&mut pending_update, SHEET_CLASS_PATH, json!(sheet));

        let result = self
            .hooks
            .pre_update_actor(PreUpdateActor {
                actor_id,
                pending_update,
            })
            .await
            .unwrap();
        self.host
            .commit_update(DocumentRef::Actor(actor_id), &result.pending_update)
            .unwrap();
        result
    }

    pub async fn bind_character_sheet(&self, actor_id: ActorId) -> PreUpdateActorResult {
        let sheet = self.app.settings.sheets.character.clone();
        self.assign_sheet(actor_id, &sheet).await
    }

    /// The actor's stored module region.
    pub fn region(&self, actor_id: ActorId) -> Value {
        self.host
            .record(DocumentRef::Actor(actor_id))
            .map(|r| r["flags"]["symbaroum5ecore"].clone())
            .unwrap_or(Value::Null)
    }
}
