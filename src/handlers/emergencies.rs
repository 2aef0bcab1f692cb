use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    models::emergency::EmergencyRequest,
    services::{emergency as emergency_service, profiles as profile_service},
    state::AppState,
};

/// The request payload for filing an emergency request.
#[derive(Deserialize, Debug)]
pub struct CreateEmergencyRequest {
    pub details: String,
}

fn request_to_json(request: &EmergencyRequest) -> Result<sonic_rs::Value> {
    // hotline_info arrives as serde_json; re-parse it for the sonic body.
    let hotline_info: sonic_rs::Value = sonic_rs::from_str(&request.hotline_info.to_string())
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok(sonic_rs::json!({
        "id": request.id.to_string(),
        "client_id": request.client_id.to_string(),
        "details": request.details,
        "status": request.status,
        "hotline_info": hotline_info,
        "created_at": request.created_at.to_rfc3339()
    }))
}

/// Files an emergency request for the calling client.
#[axum::debug_handler]
pub async fn create_emergency(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<CreateEmergencyRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let request = emergency_service::create_request(&state, &caller, req.details).await?;

    let response = sonic_rs::to_string(&request_to_json(&request)?)
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists the caller's emergency requests.
#[axum::debug_handler]
pub async fn list_emergencies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let requests = emergency_service::list_requests(&state, &caller).await?;

    let requests_json = requests
        .iter()
        .map(request_to_json)
        .collect::<Result<Vec<_>>>()?;

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "emergencies": requests_json,
        "count": requests_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
