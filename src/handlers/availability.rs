use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    services::{
        availability as availability_service, booking as booking_service,
        profiles as profile_service,
    },
    state::AppState,
};

/// The request payload for publishing an availability slot.
#[derive(Deserialize, Debug)]
pub struct CreateSlotRequest {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Lists every raw availability slot row.
#[axum::debug_handler]
pub async fn list_availability(State(state): State<AppState>) -> Result<Response> {
    let slots = availability_service::list_all(&state).await?;

    let slots_json: Vec<_> = slots
        .iter()
        .map(|s| {
            sonic_rs::json!({
                "id": s.id.to_string(),
                "counselor_id": s.counselor_id.to_string(),
                "day_of_week": s.day_of_week,
                "start_time": s.start_time.format("%H:%M:%S").to_string(),
                "end_time": s.end_time.format("%H:%M:%S").to_string()
            })
        })
        .collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "availability": slots_json,
        "count": slots_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Publishes a recurring weekly slot for the calling counselor.
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<CreateSlotRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;

    let slot = availability_service::create_slot(
        &state,
        caller.id,
        req.day_of_week,
        req.start_time,
        req.end_time,
    )
    .await?;

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "id": slot.id.to_string(),
        "day_of_week": slot.day_of_week,
        "start_time": slot.start_time.format("%H:%M:%S").to_string(),
        "end_time": slot.end_time.format("%H:%M:%S").to_string(),
        "message": "Availability slot created"
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Deletes one of the calling counselor's slots.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(slot_id): Path<Uuid>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    availability_service::delete_slot(&state, caller.id, slot_id).await?;
    Ok((StatusCode::OK, r#"{"message":"Availability slot deleted"}"#).into_response())
}

/// Resolves a counselor's open booking instants over the configured horizon.
#[axum::debug_handler]
pub async fn open_slots(
    State(state): State<AppState>,
    Path(counselor_id): Path<Uuid>,
) -> Result<Response> {
    let open = booking_service::open_slots_for_counselor(&state, counselor_id, Utc::now()).await?;

    let instants: Vec<String> = open.iter().map(|t| t.to_rfc3339()).collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "available_slots": instants
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
