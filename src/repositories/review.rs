use deadpool_postgres::Pool;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::review::Review,
};

fn row_to_review(row: &Row) -> Result<Review> {
    Ok(Review {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        session_id: row.try_get("session_id").map_err(|_| AppError::MissingData("session_id".to_string()))?,
        reviewer_id: row.try_get("reviewer_id").map_err(|_| AppError::MissingData("reviewer_id".to_string()))?,
        counselor_id: row.try_get("counselor_id").map_err(|_| AppError::MissingData("counselor_id".to_string()))?,
        rating: row.try_get("rating").map_err(|_| AppError::MissingData("rating".to_string()))?,
        comment: row.try_get("comment").map_err(|_| AppError::MissingData("comment".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a review for a session.
///
/// The unique index on `session_id` backs the one-review-per-session rule
/// under concurrency; a violation surfaces as the same validation error the
/// pre-check produces.
pub async fn create_review(
    pool: &Pool,
    id: Uuid,
    session_id: Uuid,
    reviewer_id: Uuid,
    counselor_id: Uuid,
    rating: i16,
    comment: String,
) -> Result<Review> {
    let client = pool.get().await?;
    let inserted = client
        .query_one(
            r#"
            INSERT INTO reviews (id, session_id, reviewer_id, counselor_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
            &[&id, &session_id, &reviewer_id, &counselor_id, &rating, &comment],
        )
        .await;

    match inserted {
        Ok(row) => row_to_review(&row),
        Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(AppError::Validation(
            "This session already has a review.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Returns whether the session has already been reviewed.
pub async fn exists_for_session(pool: &Pool, session_id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reviews WHERE session_id = $1
            ) AS reviewed
            "#,
            &[session_id],
        )
        .await?;
    row.try_get("reviewed").map_err(|_| AppError::MissingData("reviewed".to_string()))
}

/// Lists the reviews written about a counselor, newest first.
pub async fn list_for_counselor(pool: &Pool, counselor_id: &Uuid) -> Result<Vec<Review>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM reviews
            WHERE counselor_id = $1
            ORDER BY created_at DESC
            "#,
            &[counselor_id],
        )
        .await?;
    rows.iter().map(row_to_review).collect()
}

/// Lists every review, newest first.
pub async fn list_all(pool: &Pool) -> Result<Vec<Review>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM reviews
            ORDER BY created_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_review).collect()
}
