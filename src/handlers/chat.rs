use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    services::{chat as chat_service, profiles as profile_service},
    state::AppState,
};

/// The request payload for sending a chat message.
#[derive(Deserialize, Debug)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Posts a message into a session's chat room.
#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let message = chat_service::send_message(&state, &caller, session_id, req.content).await?;

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "id": message.id.to_string(),
        "room_id": message.room_id.to_string(),
        "sender_id": message.sender_id.to_string(),
        "content": message.content,
        "created_at": message.created_at.to_rfc3339()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists a session's chat messages, oldest first.
#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let messages = chat_service::list_messages(&state, &caller, session_id).await?;

    let messages_json: Vec<_> = messages
        .iter()
        .map(|m| {
            sonic_rs::json!({
                "id": m.id.to_string(),
                "sender_id": m.sender_id.to_string(),
                "content": m.content,
                "created_at": m.created_at.to_rfc3339()
            })
        })
        .collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "messages": messages_json,
        "count": messages_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
