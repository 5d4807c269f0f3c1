//! Host hook entry points.
//!
//! Each hook has a fixed payload and result type. [`HookBus::dispatch`]
//! routes a tagged request (`{"hook": "...", "payload": {...}}`) to the
//! matching handler.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use syb5e_domain::common::get_path;
use syb5e_domain::{ActorId, ItemId};

use crate::app::App;
use crate::entities::SpellCostCapable;
use crate::use_cases::corruption::{
    bind_actor, casting_dialog_data, CastOptions, CastingDialogData, CorruptionError,
    UsageUpdates,
};

/// Path of the sheet assignment inside a pending actor update.
pub const SHEET_CLASS_PATH: &str = "flags.core.sheetClass";

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Corruption error: {0}")]
    Corruption(#[from] CorruptionError),

    #[error("Actor {actor_id} does not own item {item_id}")]
    NotOwner { actor_id: ActorId, item_id: ItemId },
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreUpdateActor {
    pub actor_id: ActorId,
    /// Nested update record the host is about to persist.
    pub pending_update: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreUpdateActorResult {
    pub pending_update: Value,
    /// Whether defaults were merged in.
    pub initialized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCastingDialog {
    pub actor_id: ActorId,
    pub item_id: ItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCastingDialog {
    pub item_id: ItemId,
    pub consume_corruption: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingSubmission {
    pub updates: UsageUpdates,
    /// True when the updates were already written; the host must not apply
    /// them again.
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", content = "payload", rename_all = "camelCase")]
pub enum HookRequest {
    PreUpdateActor(PreUpdateActor),
    RenderCastingDialog(RenderCastingDialog),
    SubmitCastingDialog(SubmitCastingDialog),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", content = "result", rename_all = "camelCase")]
pub enum HookResponse {
    PreUpdateActor(PreUpdateActorResult),
    /// `None` when the item is not a spell.
    RenderCastingDialog(Option<CastingDialogData>),
    SubmitCastingDialog(CastingSubmission),
}

impl HookRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PreUpdateActor(_) => "preUpdateActor",
            Self::RenderCastingDialog(_) => "renderCastingDialog",
            Self::SubmitCastingDialog(_) => "submitCastingDialog",
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

pub struct HookBus {
    app: Arc<App>,
}

impl HookBus {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub async fn dispatch(&self, request: HookRequest) -> Result<HookResponse, HookError> {
        tracing::debug!(hook = request.name(), "Dispatching hook");
        match request {
            HookRequest::PreUpdateActor(payload) => self
                .pre_update_actor(payload)
                .await
                .map(HookResponse::PreUpdateActor),
            HookRequest::RenderCastingDialog(payload) => self
                .render_casting_dialog(payload)
                .await
                .map(HookResponse::RenderCastingDialog),
            HookRequest::SubmitCastingDialog(payload) => self
                .submit_casting_dialog(payload)
                .await
                .map(HookResponse::SubmitCastingDialog),
        }
    }

    /// Initialize the actor if the update assigns one of this module's
    /// sheets. Other updates pass through untouched.
    pub async fn pre_update_actor(
        &self,
        payload: PreUpdateActor,
    ) -> Result<PreUpdateActorResult, HookError> {
        let PreUpdateActor {
            actor_id,
            mut pending_update,
        } = payload;

        let sheets = &self.app.settings.sheets;
        let assigns_our_sheet = get_path(&pending_update, SHEET_CLASS_PATH)
            .and_then(Value::as_str)
            .is_some_and(|sheet| sheet == sheets.character || sheet == sheets.npc);
        if !assigns_our_sheet {
            return Ok(PreUpdateActorResult {
                pending_update,
                initialized: false,
            });
        }

        let repos = &self.app.repositories;
        let actor = bind_actor(repos.actor.as_ref(), &repos.flags, actor_id).await?;
        let initialized = self
            .app
            .use_cases
            .corruption
            .initializer
            .initialize_if_needed(&actor, &mut pending_update)
            .await
            .map_err(CorruptionError::from)?;

        Ok(PreUpdateActorResult {
            pending_update,
            initialized,
        })
    }

    pub async fn render_casting_dialog(
        &self,
        payload: RenderCastingDialog,
    ) -> Result<Option<CastingDialogData>, HookError> {
        let repos = &self.app.repositories;
        let caster = repos
            .actor
            .get(payload.actor_id)
            .await
            .map_err(CorruptionError::from)?
            .ok_or(CorruptionError::ActorNotFound(payload.actor_id))?;
        let item = self
            .app
            .use_cases
            .corruption
            .casting
            .load_item(payload.item_id)
            .await?;
        if item.item().owner.is_some_and(|owner| owner != caster.id) {
            return Err(HookError::NotOwner {
                actor_id: caster.id,
                item_id: payload.item_id,
            });
        }

        Ok(casting_dialog_data(&caster, &item))
    }

    /// Resolve the cast. With `serialize_casts` on, the update is written
    /// here under the actor's lock; otherwise it is returned for the host.
    pub async fn submit_casting_dialog(
        &self,
        payload: SubmitCastingDialog,
    ) -> Result<CastingSubmission, HookError> {
        let casting = &self.app.use_cases.corruption.casting;
        let item = casting.load_item(payload.item_id).await?;
        let options = CastOptions {
            consume_corruption: payload.consume_corruption,
        };

        if self.app.settings.serialize_casts {
            let updates = casting.cast_and_apply(&item, options).await?;
            let applied = !updates.is_empty();
            return Ok(CastingSubmission { updates, applied });
        }

        let updates = casting.resolve_cast(&item, options).await?;
        tracing::debug!(
            item_id = %item.item().id,
            actor_updates = updates.actor_updates.len(),
            "Returning usage updates to host"
        );
        Ok(CastingSubmission {
            updates,
            applied: false,
        })
    }
}
