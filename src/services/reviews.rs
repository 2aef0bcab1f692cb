use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{profile::Profile, review::Review, session::SessionStatus},
    repositories::{review as review_repo, session as session_repo},
    state::AppState,
    validation::booking::validate_rating,
};

/// Creates a review for a completed session.
///
/// Rules, checked in order: the session must exist and be completed, the
/// reviewer must be the session's client, the named counselor must match the
/// session's, and the session must not already carry a review. The unique
/// index on `reviews.session_id` backs the last rule under concurrency.
pub async fn create_review(
    state: &AppState,
    caller: &Profile,
    session_id: Uuid,
    counselor_id: Uuid,
    rating: i16,
    comment: String,
) -> Result<Review> {
    validate_rating(rating)?;

    let session = session_repo::find_by_id(&state.db, &session_id)
        .await?
        .ok_or_else(|| AppError::Validation("Session does not exist.".to_string()))?;

    if session.status != SessionStatus::Completed {
        return Err(AppError::Validation(
            "You can only review a completed session.".to_string(),
        ));
    }

    if session.client_id != caller.id {
        return Err(AppError::Validation(
            "You can only review sessions you attended as a client.".to_string(),
        ));
    }

    if session.counselor_id != counselor_id {
        return Err(AppError::Validation(
            "Counselor does not match the session's counselor.".to_string(),
        ));
    }

    if review_repo::exists_for_session(&state.db, &session_id).await? {
        return Err(AppError::Validation(
            "This session already has a review.".to_string(),
        ));
    }

    review_repo::create_review(
        &state.db,
        Uuid::new_v4(),
        session_id,
        caller.id,
        counselor_id,
        rating,
        comment,
    )
    .await
}

/// Lists reviews, optionally narrowed to one counselor.
pub async fn list_reviews(state: &AppState, counselor_id: Option<Uuid>) -> Result<Vec<Review>> {
    match counselor_id {
        Some(id) => review_repo::list_for_counselor(&state.db, &id).await,
        None => review_repo::list_all(&state.db).await,
    }
}
