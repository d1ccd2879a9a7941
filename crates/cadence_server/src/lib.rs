//! HTTP server for habit tracking.
//!
//! # Responsibility
//! - Wire core habit/day services to REST routes over one SQLite database.
//! - Own process-level concerns: config, logging bootstrap, CORS, shutdown.
//!
//! # Routes
//! - `GET /ping` liveness probe
//! - `POST /habits` create a habit for today
//! - `GET /habits` list all habits
//! - `GET /day?date=YYYY-MM-DD` schedule status for one date
//! - `PATCH /habits/{id}/toggle` flip today's completion for one habit
//! - `GET /summary` completed/possible counts for every recorded day

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use cadence_core::db::open_db;
use cadence_core::init_logging;
use log::info;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{
    create_habit_handler, day_handler, list_habits_handler, ping_handler, summary_handler,
    toggle_habit_handler,
};
use state::AppState;

/// Builds the application router over shared state.
///
/// Kept separate from [`start_server`] so tests can drive the router with
/// an in-memory database.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/habits", post(create_habit_handler).get(list_habits_handler))
        .route("/habits/{id}/toggle", patch(toggle_habit_handler))
        .route("/day", get(day_handler))
        .route("/summary", get(summary_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    let config = Config::load();

    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }

    info!(
        "event=server_start module=server status=ok port={} db_path={} log_level={}",
        config.port,
        config.db_path.display(),
        config.log_level
    );

    let conn = open_db(&config.db_path).expect("Failed to open database");
    let state = AppState::new(conn);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind server address");
    info!("event=server_listen module=server status=ok address={address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("event=server_stop module=server status=ok");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("event=server_shutdown module=server status=ok signal=ctrl_c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("event=server_shutdown module=server status=ok signal=terminate");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
