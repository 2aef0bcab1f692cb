use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthSession,
    models::review::Review,
    services::{profiles as profile_service, reviews as review_service},
    state::AppState,
};

/// The request payload for submitting a review.
#[derive(Deserialize, Debug)]
pub struct CreateReviewRequest {
    pub session_id: Uuid,
    pub counselor_id: Uuid,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// The query parameters for listing reviews.
#[derive(Deserialize)]
pub struct ListReviewsQuery {
    #[serde(default)]
    pub counselor_id: Option<Uuid>,
}

fn review_to_json(review: &Review) -> sonic_rs::Value {
    sonic_rs::json!({
        "id": review.id.to_string(),
        "session_id": review.session_id.to_string(),
        "reviewer_id": review.reviewer_id.to_string(),
        "counselor_id": review.counselor_id.to_string(),
        "rating": review.rating,
        "comment": review.comment,
        "created_at": review.created_at.to_rfc3339()
    })
}

/// Submits a review for a completed session.
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Response> {
    let caller = profile_service::require_profile(&state, auth.user_id).await?;
    let review = review_service::create_review(
        &state,
        &caller,
        req.session_id,
        req.counselor_id,
        req.rating,
        req.comment,
    )
    .await?;

    let response = sonic_rs::to_string(&review_to_json(&review))
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::CREATED, response).into_response())
}

/// Lists reviews, optionally narrowed to one counselor.
#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> Result<Response> {
    let reviews = review_service::list_reviews(&state, query.counselor_id).await?;
    let reviews_json: Vec<_> = reviews.iter().map(review_to_json).collect();

    let response = sonic_rs::to_string(&sonic_rs::json!({
        "reviews": reviews_json,
        "count": reviews_json.len()
    }))
    .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

    Ok((StatusCode::OK, response).into_response())
}
