//! reach-dashboard - terminal dashboard for reachinbox

mod api;
mod app;
mod filter;
mod poll;
mod session;
mod state;
mod theme;
mod ui;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiClient;
use crate::app::App;
use crate::session::SessionStore;

/// File-only logging: the TUI owns stdout, so tracing output goes to
/// `LOG_FILE` when set and nowhere otherwise. The guard must stay alive
/// for the non-blocking writer to flush.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let path = std::env::var("LOG_FILE").ok()?;
    let file_dir = std::path::Path::new(&path)
        .parent()
        .unwrap_or(std::path::Path::new("."));
    let file_name = std::path::Path::new(&path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("reach-dashboard.log");
    let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reach_dashboard=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();
    Some(guard)
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    let client = ApiClient::from_env();
    let session_store = SessionStore::open_default()?;
    info!(api = %client.base_url(), "Starting dashboard");

    let mut app = App::new(client, session_store);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
