//! Sandbox runner.
//!
//! Loads a JSON fixture of actors and items into the in-memory host, binds
//! this module's sheet to every actor, and prints sheet data and spell costs.
//! Set `SYB5E_CAST` to an item name to cast it once, consuming corruption.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syb5e_domain::DocumentRef;
use syb5e_engine::api::hooks::{
    HookBus, PreUpdateActor, RenderCastingDialog, SubmitCastingDialog, SHEET_CLASS_PATH,
};
use syb5e_engine::infrastructure::memory::{HostFixture, InMemoryHost};
use syb5e_engine::infrastructure::ports::{FlagStore, ItemRepo};
use syb5e_engine::infrastructure::settings::ModuleSettings;
use syb5e_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syb5e_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ModuleSettings::from_env().context("loading settings")?;
    let fixture_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var("SYB5E_FIXTURE").ok().map(PathBuf::from))
        .unwrap_or_else(|| repo_root().join("demos").join("fixture.json"));
    let cast_name = std::env::var("SYB5E_CAST").ok();

    tracing::info!(
        fixture = %fixture_path.display(),
        scope = %settings.flag_scope,
        serialize_casts = settings.serialize_casts,
        "Starting sandbox"
    );

    let fixture = HostFixture::from_path(&fixture_path)
        .with_context(|| format!("loading fixture {}", fixture_path.display()))?;
    let actors: Vec<_> = fixture.actors.iter().map(|a| a.actor.clone()).collect();
    let host = Arc::new(InMemoryHost::from_fixture(fixture));

    let (app, bus) = App::in_memory(settings, host.clone());
    let app = Arc::new(app);
    let hooks = HookBus::new(app.clone());
    let mut events = bus.subscribe();

    println!("{}", serde_json::to_string_pretty(app.flag_paths())?);

    for actor in &actors {
        let sheet = app.settings.sheets.for_kind(actor.kind);
        let mut pending_update = json!({});
        syb5e_domain::common::set_path(&mut pending_update, SHEET_CLASS_PATH, json!(sheet));

        let result = hooks
            .pre_update_actor(PreUpdateActor {
                actor_id: actor.id,
                pending_update,
            })
            .await?;
        host.commit_update(DocumentRef::Actor(actor.id), &result.pending_update)?;

        let view = app
            .use_cases
            .corruption
            .sheet
            .compose_by_id(actor.id)
            .await?;
        println!(
            "{} ({}): {}",
            actor.name,
            actor.kind,
            serde_json::to_string(&view)?
        );

        for item in host.list_owned_by(actor.id).await? {
            let cost = app
                .use_cases
                .corruption
                .casting
                .cost(item.id, None)
                .await?;
            let Some(cost) = cost else {
                println!("  {} - no corruption", item.name);
                continue;
            };
            println!("  {} - {}", item.name, cost);

            let dialog = hooks
                .render_casting_dialog(RenderCastingDialog {
                    actor_id: actor.id,
                    item_id: item.id,
                })
                .await?;
            for option in dialog.iter().flat_map(|d| d.spell_levels.iter()) {
                println!("    {}", option.label);
            }

            if cast_name.as_deref() == Some(item.name.as_str()) {
                let submission = hooks
                    .submit_casting_dialog(SubmitCastingDialog {
                        item_id: item.id,
                        consume_corruption: true,
                    })
                    .await?;
                if !submission.applied {
                    host.set_attributes(
                        DocumentRef::Actor(actor.id),
                        submission.updates.actor_updates.clone(),
                    )
                    .await?;
                }
                let view = app
                    .use_cases
                    .corruption
                    .sheet
                    .compose_by_id(actor.id)
                    .await?;
                println!("  cast {} -> {}", item.name, serde_json::to_string(&view)?);
            }
        }
    }

    while let Ok(envelope) = events.try_recv() {
        println!("event {}", serde_json::to_string(&envelope)?);
    }

    Ok(())
}

fn repo_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn load_dotenv_from_repo_root() {
    let repo_root = repo_root();

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
