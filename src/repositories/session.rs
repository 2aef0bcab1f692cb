use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use std::collections::HashSet;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::session::{Session, SessionStatus},
};

fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        counselor_id: row.try_get("counselor_id").map_err(|_| AppError::MissingData("counselor_id".to_string()))?,
        client_id: row.try_get("client_id").map_err(|_| AppError::MissingData("client_id".to_string()))?,
        datetime: row.try_get("datetime").map_err(|_| AppError::MissingData("datetime".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        notes: row.try_get("notes").map_err(|_| AppError::MissingData("notes".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a new session with status `pending`.
///
/// The ledger performs no business-rule checks; callers must have run the
/// booking validator first. The one exception is the no-double-booking
/// invariant: the partial unique index on (counselor_id, datetime) over
/// pending/confirmed rows closes the race between the caller's conflict
/// check and this insert, and a violation surfaces as the same
/// "already booked" validation error the pre-check produces.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `id` - The unique identifier for the session.
/// * `counselor_id` - The counselor being booked.
/// * `client_id` - The client making the booking.
/// * `datetime` - The scheduled instant.
/// * `notes` - Free-text notes attached to the booking.
///
/// # Returns
///
/// A `Result` containing the created `Session`.
pub async fn insert_session(
    pool: &Pool,
    id: Uuid,
    counselor_id: Uuid,
    client_id: Uuid,
    datetime: DateTime<Utc>,
    notes: String,
) -> Result<Session> {
    let client = pool.get().await?;
    let inserted = client
        .query_one(
            r#"
            INSERT INTO sessions (id, counselor_id, client_id, datetime, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&id, &counselor_id, &client_id, &datetime, &notes],
        )
        .await;

    match inserted {
        Ok(row) => row_to_session(&row),
        Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
            tracing::debug!(
                "Concurrent booking lost the race for counselor {} at {}",
                counselor_id,
                datetime
            );
            Err(AppError::Validation("This time slot is already booked.".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns whether a pending or confirmed session exists for the counselor
/// at exactly the given instant.
pub async fn exists_conflict(
    pool: &Pool,
    counselor_id: &Uuid,
    datetime: &DateTime<Utc>,
) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM sessions
                WHERE counselor_id = $1
                  AND datetime = $2
                  AND status IN ('pending', 'confirmed')
            ) AS clash
            "#,
            &[counselor_id, datetime],
        )
        .await?;
    row.try_get("clash").map_err(|_| AppError::MissingData("clash".to_string()))
}

/// Collects the counselor's busy instants after the given cutoff.
///
/// Only pending and confirmed sessions occupy their slot.
pub async fn busy_instants(
    pool: &Pool,
    counselor_id: &Uuid,
    after: DateTime<Utc>,
) -> Result<HashSet<DateTime<Utc>>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT datetime
            FROM sessions
            WHERE counselor_id = $1
              AND datetime > $2
              AND status IN ('pending', 'confirmed')
            "#,
            &[counselor_id, &after],
        )
        .await?;
    rows.iter()
        .map(|r| r.try_get("datetime").map_err(|_| AppError::MissingData("datetime".to_string())))
        .collect()
}

/// Finds a session by its ID.
pub async fn find_by_id(pool: &Pool, session_id: &Uuid) -> Result<Option<Session>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM sessions
            WHERE id = $1
            "#,
            &[session_id],
        )
        .await?;
    row.map(|r| row_to_session(&r)).transpose()
}

/// Lists the sessions a profile takes part in, as client or counselor.
pub async fn list_for_profile(pool: &Pool, profile_id: &Uuid) -> Result<Vec<Session>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM sessions
            WHERE client_id = $1 OR counselor_id = $1
            ORDER BY datetime ASC
            "#,
            &[profile_id],
        )
        .await?;
    rows.iter().map(row_to_session).collect()
}

/// Moves a session's status, guarded by the expected current status.
///
/// Transition legality is the lifecycle controller's concern, not the
/// ledger's, but the status predicate makes the write a compare-and-swap:
/// a concurrent transition that commits first leaves this update matching
/// zero rows instead of overwriting the newer status.
pub async fn update_status(
    pool: &Pool,
    session_id: &Uuid,
    from: SessionStatus,
    to: SessionStatus,
) -> Result<Option<Session>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE sessions
            SET status = $1
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
            &[&to, session_id, &from],
        )
        .await?;
    row.map(|r| row_to_session(&r)).transpose()
}
