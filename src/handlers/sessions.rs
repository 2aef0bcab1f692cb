use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    models::session::Session,
    services::{booking as booking_service, profiles as profile_service},
    state::AppState,
    validation::booking::parse_session_status,
};

/// The request payload for booking a session.
#[derive(Deserialize, Debug)]
pub struct BookSessionRequest {
    pub counselor_id: Uuid,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// The request payload for a status transition.
#[derive(Deserialize, Debug)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn session_to_json(session: &Session) -> sonic_rs::Value {
    sonic_rs::json!({
        "id": session.id.to_string(),
        "counselor_id": session.counselor_id.to_string(),
        "client_id": session.client_id.to_string(),
        "datetime": session.datetime.to_rfc3339(),
        "status": session.status.as_str(),
        "notes": session.notes,
        "created_at": session.created_at.to_rfc3339()
    })
}

/// Books a session with a counselor. The caller is the client.
#[axum::debug_handler]
pub async fn book_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<BookSessionRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;

    let session = booking_service::validate_and_book(
        &state,
        req.counselor_id,
        caller.id,
        req.datetime,
        req.notes,
        Utc::now(),
    )
    .await?;

    let response = sonic_rs::to_string(&session_to_json(&session))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists the caller's sessions, as client or counselor.
#[axum::debug_handler]
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let sessions = booking_service::sessions_for_profile(&state, caller.id).await?;

    let sessions_json: Vec<_> = sessions.iter().map(session_to_json).collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "sessions": sessions_json,
        "count": sessions_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Gets one of the caller's sessions.
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let session =
        booking_service::session_for_participant(&state, caller.id, session_id).await?;

    let response = sonic_rs::to_string(&session_to_json(&session))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Moves a session to a new lifecycle status.
#[axum::debug_handler]
pub async fn update_session_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Response> {
    // Any authenticated profile may drive the lifecycle; see DESIGN.md.
    profile_service::require_profile(&state, auth.user_id).await?;

    let new_status = parse_session_status(&req.status)?;
    let session = booking_service::transition_session(&state, session_id, new_status).await?;

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "id": session.id.to_string(),
        "status": session.status.as_str(),
        "message": "Session status updated"
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
