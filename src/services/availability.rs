use chrono::NaiveTime;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{availability::AvailabilitySlot, profile::Role},
    repositories::{availability as availability_repo, profile as profile_repo},
    state::AppState,
    validation::booking::{validate_day_of_week, validate_slot_window},
};

/// Creates a recurring weekly availability slot for a counselor.
///
/// Overlap with the counselor's existing slots is deliberately not rejected
/// or merged here; slots are independently authored and taken as given by
/// the resolver.
pub async fn create_slot(
    state: &AppState,
    counselor_id: Uuid,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<AvailabilitySlot> {
    let profile = profile_repo::find_by_id(&state.db, &counselor_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if profile.role != Role::Counselor {
        return Err(AppError::Validation(
            "Only counselors can publish availability.".to_string(),
        ));
    }

    validate_day_of_week(day_of_week)?;
    validate_slot_window(start_time, end_time)?;

    availability_repo::create_slot(
        &state.db,
        Uuid::new_v4(),
        counselor_id,
        day_of_week,
        start_time,
        end_time,
    )
    .await
}

/// Deletes one of the counselor's own slots.
pub async fn delete_slot(state: &AppState, counselor_id: Uuid, slot_id: Uuid) -> Result<()> {
    let deleted = availability_repo::delete_slot(&state.db, &slot_id, &counselor_id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Lists every availability slot in the system.
pub async fn list_all(state: &AppState) -> Result<Vec<AvailabilitySlot>> {
    availability_repo::list_all(&state.db).await
}
