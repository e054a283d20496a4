//! Chat and reset handlers. Each chat request runs one engine turn against the
//! caller's session; reset clears a session and always reports success.

use crate::AppState;
use axum::extract::{Json, State};
use repro_core::ChatReply;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) response: String,
    pub(crate) session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResetRequest {
    #[serde(default)]
    pub(crate) session_id: Option<String>,
}

/// POST /api/v1/chat
pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::info!(
        target: "repro::gateway",
        chars = req.message.chars().count(),
        has_session = req.session_id.is_some(),
        "Chat request received"
    );
    let reply = run_turn(&state, req);
    Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id,
    })
}

/// The generator never lives across an await point.
fn run_turn(state: &AppState, req: ChatRequest) -> ChatReply {
    let mut rng = rand::thread_rng();
    state
        .sessions
        .converse(&state.engine, req.session_id, &req.message, &mut rng)
}

/// POST /api/v1/reset
pub(crate) async fn reset(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Json<serde_json::Value> {
    if let Some(session_id) = req.session_id.as_deref() {
        let existed = state.sessions.reset(session_id);
        tracing::info!(target: "repro::gateway", session_id, existed, "Conversation reset");
    }
    Json(serde_json::json!({ "status": "success", "message": "Conversation reset" }))
}
