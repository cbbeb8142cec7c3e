//! GreenRide Ops Console - fleet dashboards for platform operators.
//!
//! Keeps an authenticated session against the GreenRide platform durable
//! across runs and renders ride, driver, feedback, and revenue summaries.

mod api;
mod auth;
mod charts;
mod config;
mod dashboard;
mod models;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::ApiClient;
use auth::{AuthGate, DiskStorage, GateState, MemoryStorage, SessionStorage, SessionStore};
use config::Config;
use dashboard::Dashboard;

const USAGE: &str = "\
GreenRide ops console

Usage: greenride-ops [COMMAND]

Commands:
  status   Check the stored session and show who is signed in (default)
  login    Sign in with GREENRIDE_EMAIL / GREENRIDE_PASSWORD
  logout   Sign out and revoke the stored session
  refresh  Fetch fleet data and print chart summaries
";

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug); with a data
/// directory available, output also lands in a daily file under it.
fn init_tracing(data_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match data_dir {
        Some(dir) => {
            let file_appender =
                tracing_appender::rolling::daily(dir.join("logs"), "greenride-ops.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(file_writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pull in a .env file when there is one; absence is fine
    let _ = dotenvy::dotenv();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: could not read config ({}), using defaults", e);
        Config::default()
    });
    let data_dir = config.data_dir();

    let _log_guard = init_tracing(data_dir.as_deref());
    info!("GreenRide ops console starting");

    let storage: Arc<dyn SessionStorage> = match &data_dir {
        Some(dir) => Arc::new(DiskStorage::new(dir.clone())),
        None => {
            warn!("No platform data directory; session will not persist");
            Arc::new(MemoryStorage::new())
        }
    };
    let api = ApiClient::new(config.api_url())?;
    let store = Arc::new(SessionStore::new(storage.clone(), Arc::new(api.clone())));
    let authenticated = store.is_authenticated().await;
    info!(authenticated, "Session store ready");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("status");

    let result = match command {
        "status" => run_status(&store).await,
        "login" => run_login(&api, &store, config).await,
        "logout" => run_logout(&store).await,
        "refresh" => run_refresh(&api, storage.as_ref(), &store).await,
        "--help" | "-h" | "help" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}\n", other);
            print!("{}", USAGE);
            Ok(())
        }
    };

    info!("GreenRide ops console shutting down");
    result
}

/// Revalidate the stored session and report the gate decision.
async fn run_status(store: &Arc<SessionStore>) -> Result<()> {
    let gate = AuthGate::new(store.clone());

    // Report the rehydrated session first, then verify it with the platform
    if gate.state().await == GateState::Authenticated {
        if let Some(identity) = store.identity().await {
            println!("Stored session: {} <{}>", identity.name, identity.email);
        }
    }

    store.revalidate().await;
    match gate.settled().await {
        GateState::Authenticated => {
            if let Some(identity) = store.identity().await {
                println!("Signed in as {} <{}>", identity.name, identity.email);
                println!(
                    "Role: {}  Last sign-in: {}",
                    identity.role(),
                    identity.last_seen()
                );
            }
        }
        state => {
            println!("{}", state);
            if let Some(route) = state.redirect() {
                println!("Visit {} or run `greenride-ops login` to sign in.", route);
            }
        }
    }
    Ok(())
}

/// Sign in with credentials from the environment and persist the session.
async fn run_login(api: &ApiClient, store: &Arc<SessionStore>, mut config: Config) -> Result<()> {
    let email = std::env::var("GREENRIDE_EMAIL")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| config.last_email.clone())
        .ok_or_else(|| anyhow::anyhow!("Set GREENRIDE_EMAIL (and GREENRIDE_PASSWORD) to sign in"))?;
    let password = std::env::var("GREENRIDE_PASSWORD")
        .map_err(|_| anyhow::anyhow!("Set GREENRIDE_PASSWORD to sign in"))?;

    let login = api.login(&email, &password).await?;
    store.store_token(&login.token);
    store.set_identity(Some(login.admin.clone())).await;

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Could not save config");
    }

    println!("Signed in as {} ({})", login.admin.name, login.admin.role());
    Ok(())
}

async fn run_logout(store: &Arc<SessionStore>) -> Result<()> {
    store.clear().await;
    println!("Signed out.");
    Ok(())
}

/// Fetch fleet data behind the gate and print the chart summaries.
async fn run_refresh(
    api: &ApiClient,
    storage: &dyn SessionStorage,
    store: &Arc<SessionStore>,
) -> Result<()> {
    store.revalidate().await;

    let gate = AuthGate::new(store.clone());
    let state = gate.settled().await;
    if !state.renders_protected() {
        println!("{}", state);
        if let Some(route) = state.redirect() {
            println!("Visit {} or run `greenride-ops login` to sign in.", route);
        }
        return Ok(());
    }

    let token = storage.load_token().ok_or_else(|| {
        anyhow::anyhow!("Session token disappeared; run `greenride-ops login`")
    })?;

    let mut dashboard = Dashboard::new(api.with_token(token));
    dashboard.refresh_all().await;

    if dashboard.auth_expired {
        store.clear().await;
    }
    if let Some(message) = &dashboard.status_message {
        eprintln!("{}", message);
    }

    for line in dashboard.summary(Utc::now().date_naive()) {
        println!("{}", line);
    }
    Ok(())
}
