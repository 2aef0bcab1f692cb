use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::availability::AvailabilitySlot,
};

fn row_to_slot(row: &Row) -> Result<AvailabilitySlot> {
    Ok(AvailabilitySlot {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        counselor_id: row.try_get("counselor_id").map_err(|_| AppError::MissingData("counselor_id".to_string()))?,
        day_of_week: row.try_get("day_of_week").map_err(|_| AppError::MissingData("day_of_week".to_string()))?,
        start_time: row.try_get("start_time").map_err(|_| AppError::MissingData("start_time".to_string()))?,
        end_time: row.try_get("end_time").map_err(|_| AppError::MissingData("end_time".to_string()))?,
    })
}

/// Lists a counselor's availability slots in store order.
///
/// The ordering (day, start time, id) is part of the slot resolver's
/// contract: resolved instants follow this iteration order.
pub async fn list_for_counselor(pool: &Pool, counselor_id: &Uuid) -> Result<Vec<AvailabilitySlot>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM availability_slots
            WHERE counselor_id = $1
            ORDER BY day_of_week ASC, start_time ASC, id ASC
            "#,
            &[counselor_id],
        )
        .await?;
    rows.iter().map(row_to_slot).collect()
}

/// Lists every availability slot in the system.
pub async fn list_all(pool: &Pool) -> Result<Vec<AvailabilitySlot>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM availability_slots
            ORDER BY counselor_id ASC, day_of_week ASC, start_time ASC, id ASC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_slot).collect()
}

/// Creates a new availability slot for a counselor.
pub async fn create_slot(
    pool: &Pool,
    id: Uuid,
    counselor_id: Uuid,
    day_of_week: i16,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
) -> Result<AvailabilitySlot> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO availability_slots (id, counselor_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&id, &counselor_id, &day_of_week, &start_time, &end_time],
        )
        .await?;
    row_to_slot(&row)
}

/// Deletes a slot owned by the given counselor.
///
/// # Returns
///
/// `true` if a slot was deleted.
pub async fn delete_slot(pool: &Pool, slot_id: &Uuid, counselor_id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let deleted = client
        .execute(
            r#"
            DELETE FROM availability_slots
            WHERE id = $1 AND counselor_id = $2
            "#,
            &[slot_id, counselor_id],
        )
        .await?;
    Ok(deleted > 0)
}
