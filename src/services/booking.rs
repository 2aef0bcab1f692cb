use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{
        profile::Role,
        session::{Session, SessionStatus},
    },
    repositories::{availability as availability_repo, profile as profile_repo, session as session_repo},
    services::scheduling,
    state::AppState,
};

/// Validates a booking request and, if it passes, writes the session.
///
/// Checks run in order and the first failure wins:
/// 1. the requested instant lies strictly in the future of `now`;
/// 2. the counselor has an availability window covering it;
/// 3. no pending or confirmed session already holds it.
///
/// `now` is passed explicitly so the validator is deterministic under test.
/// The final conflict check is re-run by the ledger's unique index at insert
/// time, so two concurrent requests for the same slot cannot both succeed.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `counselor_id` - The counselor being booked.
/// * `client_id` - The client making the booking.
/// * `datetime` - The requested instant.
/// * `notes` - Free-text notes for the session.
/// * `now` - The current time.
///
/// # Returns
///
/// A `Result` containing the created `Session` with status `pending`.
pub async fn validate_and_book(
    state: &AppState,
    counselor_id: Uuid,
    client_id: Uuid,
    datetime: DateTime<Utc>,
    notes: String,
    now: DateTime<Utc>,
) -> Result<Session> {
    let counselor = profile_repo::find_by_id(&state.db, &counselor_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if counselor.role != Role::Counselor {
        return Err(AppError::Validation(
            "The selected profile is not a counselor.".to_string(),
        ));
    }

    let booker = profile_repo::find_by_id(&state.db, &client_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if booker.role != Role::Client {
        return Err(AppError::Validation(
            "Only clients can book sessions.".to_string(),
        ));
    }

    if datetime <= now {
        return Err(AppError::Validation(
            "You cannot book a date from the past".to_string(),
        ));
    }

    let slots = availability_repo::list_for_counselor(&state.db, &counselor_id).await?;
    if !scheduling::availability_covers(&slots, datetime) {
        return Err(AppError::Validation(
            "This counselor is not available at this time.".to_string(),
        ));
    }

    if session_repo::exists_conflict(&state.db, &counselor_id, &datetime).await? {
        return Err(AppError::Validation(
            "This time slot is already booked.".to_string(),
        ));
    }

    let session = session_repo::insert_session(
        &state.db,
        Uuid::new_v4(),
        counselor_id,
        client_id,
        datetime,
        notes,
    )
    .await?;

    tracing::info!(
        "✅ Session {} booked: counselor {} at {}",
        session.id,
        counselor_id,
        datetime
    );

    Ok(session)
}

/// Resolves the counselor's open booking instants over the configured
/// horizon.
///
/// A best-effort read: no lock is taken, so a returned instant may be booked
/// by a concurrent request before the caller acts on it. `validate_and_book`
/// re-checks at write time.
pub async fn open_slots_for_counselor(
    state: &AppState,
    counselor_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>> {
    let counselor = profile_repo::find_by_id(&state.db, &counselor_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if counselor.role != Role::Counselor {
        return Err(AppError::Validation(
            "The selected profile is not a counselor.".to_string(),
        ));
    }

    let mut slots = availability_repo::list_for_counselor(&state.db, &counselor_id).await?;
    if state.config.merge_overlapping_slots {
        slots = scheduling::merge_overlapping_slots(&slots);
    }

    let busy = session_repo::busy_instants(&state.db, &counselor_id, now).await?;

    Ok(scheduling::resolve_open_slots(
        &slots,
        &busy,
        now,
        state.config.resolver_horizon_days,
        state.config.slot_granularity(),
    ))
}

/// Lists the sessions a profile takes part in, as client or counselor.
pub async fn sessions_for_profile(state: &AppState, profile_id: Uuid) -> Result<Vec<Session>> {
    session_repo::list_for_profile(&state.db, &profile_id).await
}

/// Fetches a session visible to the given participant.
pub async fn session_for_participant(
    state: &AppState,
    participant_id: Uuid,
    session_id: Uuid,
) -> Result<Session> {
    let session = session_repo::find_by_id(&state.db, &session_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !session.has_participant(participant_id) {
        return Err(AppError::NotFound);
    }
    Ok(session)
}

/// Moves a session to a new lifecycle status.
///
/// Legal transitions: pending may be confirmed or cancelled; confirmed may
/// be completed or cancelled; completed and cancelled are terminal. An
/// illegal transition is rejected without touching the row.
///
/// The legality check is re-run at write time: the update only applies while
/// the session still holds the status the check saw, so two concurrent
/// transitions cannot both commit and push a terminal session further.
pub async fn transition_session(
    state: &AppState,
    session_id: Uuid,
    new_status: SessionStatus,
) -> Result<Session> {
    let session = session_repo::find_by_id(&state.db, &session_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !session.status.can_transition_to(new_status) {
        return Err(AppError::Validation(format!(
            "A {} session cannot be moved to {}.",
            session.status, new_status
        )));
    }

    let updated =
        session_repo::update_status(&state.db, &session_id, session.status, new_status).await?;

    let updated = match updated {
        Some(session) => session,
        // Lost a concurrent transition; report against the fresh status.
        None => {
            let fresh = session_repo::find_by_id(&state.db, &session_id)
                .await?
                .ok_or(AppError::NotFound)?;
            return Err(AppError::Validation(format!(
                "A {} session cannot be moved to {}.",
                fresh.status, new_status
            )));
        }
    };

    tracing::info!("Session {} moved {} -> {}", session_id, session.status, new_status);

    Ok(updated)
}
