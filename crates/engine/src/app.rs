//! Application state and composition.

use std::sync::Arc;

use syb5e_domain::{ActorFlags, ActorId, FlagPaths};

use crate::entities::ModuleFlags;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    dice_roller::DiceRoller,
    event_bus::InProcessEventBus,
    memory::InMemoryHost,
    ports::{
        ActorRepo, ClockPort, EventBusPort, FlagStore, FormulaRoller, ItemRepo, RandomPort,
    },
    settings::ModuleSettings,
};
use crate::use_cases::{self, corruption::CorruptionError};

/// Host-provided ports.
pub struct HostPorts {
    pub actors: Arc<dyn ActorRepo>,
    pub items: Arc<dyn ItemRepo>,
    pub flags: Arc<dyn FlagStore>,
    pub roller: Arc<dyn FormulaRoller>,
}

/// Main application state.
///
/// Built once at startup and passed by reference to hook handlers.
pub struct App {
    pub settings: ModuleSettings,
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub events: Arc<dyn EventBusPort>,
}

/// Container for host ports and the flag entity built on them.
pub struct Repositories {
    pub actor: Arc<dyn ActorRepo>,
    pub item: Arc<dyn ItemRepo>,
    pub flags: Arc<ModuleFlags>,
}

/// Container for all use cases.
pub struct UseCases {
    pub corruption: use_cases::CorruptionUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(settings: ModuleSettings, host: HostPorts, events: Arc<dyn EventBusPort>) -> Self {
        let flags = Arc::new(ModuleFlags::new(host.flags, settings.flag_scope.clone()));

        let repositories = Repositories {
            actor: host.actors.clone(),
            item: host.items.clone(),
            flags: flags.clone(),
        };

        let corruption = use_cases::CorruptionUseCases::new(
            Arc::new(use_cases::corruption::CorruptionStateOps::new(
                host.actors.clone(),
                flags.clone(),
                events.clone(),
            )),
            Arc::new(use_cases::corruption::Initializer::new(
                host.actors.clone(),
                flags.clone(),
                events.clone(),
            )),
            Arc::new(use_cases::corruption::CastingResolver::new(
                host.actors.clone(),
                host.items.clone(),
                flags.clone(),
                host.roller,
                events.clone(),
            )),
            Arc::new(use_cases::corruption::SheetDataComposer::new(
                host.actors,
                flags,
            )),
        );

        Self {
            settings,
            repositories,
            use_cases: UseCases { corruption },
            events,
        }
    }

    /// Wire an App against the in-memory host with system clock and dice.
    ///
    /// Returns the concrete bus so callers can subscribe.
    pub fn in_memory(
        settings: ModuleSettings,
        host: Arc<InMemoryHost>,
    ) -> (Self, Arc<InProcessEventBus>) {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
        Self::in_memory_with(settings, host, clock, random)
    }

    pub fn in_memory_with(
        settings: ModuleSettings,
        host: Arc<InMemoryHost>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> (Self, Arc<InProcessEventBus>) {
        let bus = Arc::new(InProcessEventBus::new(settings.event_capacity, clock));
        let ports = HostPorts {
            actors: host.clone(),
            items: host.clone(),
            flags: host,
            roller: Arc::new(DiceRoller::new(random)),
        };
        let app = Self::new(settings, ports, bus.clone());
        (app, bus)
    }

    /// Reset an actor's module data. `overwrite` discards stored values.
    pub async fn reinitialize_actor(
        &self,
        actor_id: ActorId,
        overwrite: bool,
    ) -> Result<ActorFlags, CorruptionError> {
        self.use_cases
            .corruption
            .initializer
            .reinitialize_by_id(actor_id, overwrite)
            .await
    }

    pub fn flag_paths(&self) -> &FlagPaths {
        self.repositories.flags.paths()
    }
}
