//! Axum route handlers for the Conversation API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::conversation::orchestrator::AdvanceResponse;
use crate::conversation::state::{CompletedAssessment, ConversationState, Phase};
use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Progress {
    pub resolved: usize,
    pub required: usize,
}

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub conversation_id: Uuid,
    pub phase: Phase,
    pub progress: Progress,
    pub history: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CompletedAssessment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ConversationState> for ConversationView {
    fn from(state: &ConversationState) -> Self {
        let draft = state.draft();
        Self {
            conversation_id: state.id(),
            phase: state.phase(),
            progress: Progress {
                resolved: draft.resolved_count(),
                required: draft.required_slots().count(),
            },
            history: state.history().to_vec(),
            result: state.result().cloned(),
            created_at: state.created_at(),
            updated_at: state.updated_at(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/conversations
pub async fn handle_create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AdvanceResponse>), AppError> {
    let mut conversation = ConversationState::new();
    let id = conversation.id();
    let turn = state.orchestrator.start(&mut conversation)?;
    state.conversations.insert(conversation).await;
    info!("Started conversation {id}");
    Ok((
        StatusCode::CREATED,
        Json(AdvanceResponse::from_turn(id, turn)),
    ))
}

/// GET /api/v1/conversations/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationView>, AppError> {
    let handle = state
        .conversations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Conversation {id} not found")))?;
    let conversation = handle.lock().await;
    Ok(Json(ConversationView::from(&*conversation)))
}

/// POST /api/v1/conversations/:id/messages
pub async fn handle_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let handle = state
        .conversations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Conversation {id} not found")))?;

    // Held across the interpreter call: one turn per conversation at a time.
    let mut conversation = handle.lock().await;
    let turn = state
        .orchestrator
        .advance(&mut conversation, &req.content)
        .await?;
    Ok(Json(AdvanceResponse::from_turn(id, turn)))
}

/// DELETE /api/v1/conversations/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.conversations.remove(id).await {
        info!("Abandoned conversation {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Conversation {id} not found")))
    }
}
