//! Corruption use cases.
//!
//! State reads and edits, initialization, spell costs and casting, and the
//! sheet/dialog projections.

mod casting;
mod dialog;
mod error;
mod initializer;
mod sheet;
mod state;

use std::sync::Arc;

use syb5e_domain::ActorId;

use crate::entities::{CorruptionActor, ModuleFlags};
use crate::infrastructure::ports::ActorRepo;

pub use casting::{ActorGuard, ActorLocks, CastOptions, CastingResolver, UsageUpdates};
pub use dialog::{
    casting_dialog_data, level_label, relabel_consume_prompt, CastingDialogData,
    SpellLevelOption, CONSUME_PROMPT,
};
pub use error::{CastingFailure, CorruptionError};
pub use initializer::Initializer;
pub use sheet::{SheetDataComposer, SheetView};
pub use state::CorruptionStateOps;

/// Container for corruption use cases.
pub struct CorruptionUseCases {
    pub state: Arc<CorruptionStateOps>,
    pub initializer: Arc<Initializer>,
    pub casting: Arc<CastingResolver>,
    pub sheet: Arc<SheetDataComposer>,
}

impl CorruptionUseCases {
    pub fn new(
        state: Arc<CorruptionStateOps>,
        initializer: Arc<Initializer>,
        casting: Arc<CastingResolver>,
        sheet: Arc<SheetDataComposer>,
    ) -> Self {
        Self {
            state,
            initializer,
            casting,
            sheet,
        }
    }
}

/// Look up a host actor and wrap it with flag access.
pub(crate) async fn bind_actor(
    actors: &dyn ActorRepo,
    flags: &Arc<ModuleFlags>,
    actor_id: ActorId,
) -> Result<CorruptionActor, CorruptionError> {
    let actor = actors
        .get(actor_id)
        .await?
        .ok_or(CorruptionError::ActorNotFound(actor_id))?;
    Ok(CorruptionActor::new(actor, flags.clone()))
}
