//! Axum-based HTTP gateway for the reproducibility chatbot. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use repro_core::{CoreConfig, ResponseEngine, SessionSnapshot, SessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pre-flight check: config loads, engine tables validate, port is available.
fn run_verify() -> Result<(), String> {
    print!("Loading config... ");
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    println!("OK ({})", config.app_name);

    print!("Validating knowledge tables... ");
    let engine = config
        .build_engine()
        .map_err(|e| format!("Engine construction failed: {}", e))?;
    println!(
        "OK ({} topics, {} software profiles)",
        engine.knowledge().len(),
        engine.software().profiles().len()
    );

    let addr = bind_addr(&config)?;
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("{} BLOCKED: {}", addr, e)),
    }

    println!("\nAll checks passed. Ready to start gateway.");
    Ok(())
}

fn bind_addr(config: &CoreConfig) -> Result<SocketAddr, String> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", config.host, config.port, e))
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[repro-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(target: "repro::gateway", "Gateway stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Arc::new(CoreConfig::load()?);
    let engine = Arc::new(config.build_engine()?);
    let sessions = Arc::new(SessionStore::with_history_limit(config.history_limit));

    tracing::info!(
        target: "repro::gateway",
        topics = engine.knowledge().len(),
        history_limit = sessions.history_limit(),
        "Response engine ready"
    );

    if config.session_ttl_secs > 0 {
        tokio::spawn(session_sweep_loop(
            Arc::clone(&sessions),
            Duration::from_secs(config.session_ttl_secs),
            Duration::from_secs(config.sweep_interval_secs.max(1)),
        ));
    }

    let addr = bind_addr(&config)?;
    let app = build_app(AppState {
        config: Arc::clone(&config),
        engine,
        sessions,
    });

    tracing::info!(target: "repro::gateway", "{} listening on {}", config.app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Evicts idle sessions on a fixed tick. Session lifetime is a gateway policy, not an engine one.
async fn session_sweep_loop(sessions: Arc<SessionStore>, ttl: Duration, tick: Duration) {
    tracing::info!(
        target: "repro::gateway",
        ttl_secs = ttl.as_secs(),
        tick_secs = tick.as_secs(),
        "Session sweeper started"
    );
    let mut interval = tokio::time::interval(tick);
    loop {
        interval.tick().await;
        let evicted = sessions.evict_idle(ttl);
        tracing::debug!(
            target: "repro::gateway",
            evicted,
            active = sessions.len(),
            "Session sweep"
        );
    }
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/chat", post(handlers::chat::chat))
        .route("/api/v1/reset", post(handlers::chat::reset))
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/api/v1/topics", get(topics))
        .route("/api/v1/sessions/:session_id", get(get_session))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) engine: Arc<ResponseEngine>,
    pub(crate) sessions: Arc<SessionStore>,
}

/// GET /api/v1/health – static liveness; never touches the engine or sessions.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "bot": state.config.bot_name }))
}

/// GET /api/v1/status – app identity and live counters.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "bot": state.config.bot_name,
        "port": state.config.port,
        "active_sessions": state.sessions.len(),
        "topics": state.engine.knowledge().len(),
        "history_limit": state.sessions.history_limit(),
    }))
}

/// GET /api/v1/topics – topics in declaration (tie-break) order.
async fn topics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let topics: Vec<serde_json::Value> = state
        .engine
        .knowledge()
        .topics()
        .into_iter()
        .map(|t| serde_json::json!({ "id": t.as_str(), "label": t.label() }))
        .collect();
    Json(serde_json::json!({ "topics": topics }))
}

/// GET /api/v1/sessions/:session_id – context and transcript of one session.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    state
        .sessions
        .snapshot(&session_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
