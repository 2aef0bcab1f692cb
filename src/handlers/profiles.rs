use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    models::profile::{ApplicationStatus, CounselorApplication, Profile, Role},
    services::profiles as profile_service,
    state::AppState,
};

/// The request payload for creating a profile.
#[derive(Deserialize, Debug)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub bio: String,
}

/// The request payload for updating a profile.
#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub bio: String,
}

/// The query parameters for listing profiles.
#[derive(Deserialize)]
pub struct ListProfilesQuery {
    #[serde(default)]
    pub role: Option<String>,
}

/// The request payload for attaching client details.
#[derive(Deserialize, Debug)]
pub struct CreateClientProfileRequest {
    pub age: i32,
    pub gender: String,
    pub preferences: Option<String>,
}

/// The request payload for a counselor application.
#[derive(Deserialize, Debug)]
pub struct SubmitApplicationRequest {
    pub specialization: String,
    pub experience_years: i32,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub certifications: String,
}

/// The request payload for reviewing an application.
#[derive(Deserialize, Debug)]
pub struct ReviewApplicationRequest {
    pub status: String,
}

fn profile_to_json(profile: &Profile) -> sonic_rs::Value {
    sonic_rs::json!({
        "id": profile.id.to_string(),
        "user_id": profile.user_id.to_string(),
        "username": profile.username,
        "role": profile.role.as_str(),
        "bio": profile.bio,
        "created_at": profile.created_at.to_rfc3339()
    })
}

fn application_to_json(application: &CounselorApplication) -> sonic_rs::Value {
    sonic_rs::json!({
        "id": application.id.to_string(),
        "profile_id": application.profile_id.to_string(),
        "status": application.status.as_str(),
        "specialization": application.specialization,
        "experience_years": application.experience_years,
        "availability": application.availability,
        "certifications": application.certifications,
        "submitted_at": application.submitted_at.to_rfc3339()
    })
}

/// Creates a profile for the calling account.
#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Response> {
    let profile =
        profile_service::create_profile(&state, auth.user_id, auth.username.clone(), req.bio)
            .await?;

    let response = sonic_rs::to_string(&profile_to_json(&profile))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists profiles, optionally filtered by role.
#[axum::debug_handler]
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ListProfilesQuery>,
) -> Result<Response> {
    let role = match query.role.as_deref() {
        Some(raw) => Some(Role::from_str(raw).map_err(|_| {
            AppError::Validation("Role must be client or counselor".to_string())
        })?),
        None => None,
    };

    let profiles = profile_service::list_profiles(&state, role).await?;
    let profiles_json: Vec<_> = profiles.iter().map(profile_to_json).collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "profiles": profiles_json,
        "count": profiles_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Gets a profile by ID.
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Response> {
    let profile = profile_service::get_profile(&state, profile_id).await?;

    let response = sonic_rs::to_string(&profile_to_json(&profile))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Updates the caller's own profile.
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(profile_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let profile = profile_service::update_own_bio(&state, &caller, profile_id, req.bio).await?;

    let response = sonic_rs::to_string(&profile_to_json(&profile))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Attaches client details to the caller's profile.
#[axum::debug_handler]
pub async fn create_client_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<CreateClientProfileRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let details = profile_service::create_client_profile(
        &state,
        &caller,
        req.age,
        req.gender,
        req.preferences,
    )
    .await?;

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "id": details.id.to_string(),
        "profile_id": details.profile_id.to_string(),
        "age": details.age,
        "gender": details.gender,
        "preferences": details.preferences
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists all client detail records.
#[axum::debug_handler]
pub async fn list_client_profiles(State(state): State<AppState>) -> Result<Response> {
    let details = profile_service::list_client_profiles(&state).await?;

    let details_json: Vec<_> = details
        .iter()
        .map(|d| {
            sonic_rs::json!({
                "id": d.id.to_string(),
                "profile_id": d.profile_id.to_string(),
                "age": d.age,
                "gender": d.gender,
                "preferences": d.preferences
            })
        })
        .collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "client_profiles": details_json,
        "count": details_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Submits a counselor application for the caller's profile.
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<SubmitApplicationRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let application = profile_service::submit_application(
        &state,
        &caller,
        req.specialization,
        req.experience_years,
        req.availability,
        req.certifications,
    )
    .await?;

    let response = sonic_rs::to_string(&application_to_json(&application))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists counselor applications.
#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<Response> {
    let applications = profile_service::list_applications(&state).await?;
    let applications_json: Vec<_> = applications.iter().map(application_to_json).collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "applications": applications_json,
        "count": applications_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Gets a counselor application by ID.
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Response> {
    let application = profile_service::get_application(&state, application_id).await?;

    let response = sonic_rs::to_string(&application_to_json(&application))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}

/// Approves or rejects a counselor application.
#[axum::debug_handler]
pub async fn review_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<ReviewApplicationRequest>,
) -> Result<Response> {
    // The data model has no admin role, so any authenticated profile may
    // review applications; see DESIGN.md.
    let status = ApplicationStatus::from_str(&req.status).map_err(|_| {
        AppError::Validation("Status must be one of: pending, approved, rejected".to_string())
    })?;

    let application = profile_service::review_application(&state, application_id, status).await?;

    let response = sonic_rs::to_string(&application_to_json(&application))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
