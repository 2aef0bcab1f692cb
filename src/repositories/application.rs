use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::profile::{ApplicationStatus, CounselorApplication},
};

fn row_to_application(row: &Row) -> Result<CounselorApplication> {
    Ok(CounselorApplication {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        profile_id: row.try_get("profile_id").map_err(|_| AppError::MissingData("profile_id".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        specialization: row.try_get("specialization").map_err(|_| AppError::MissingData("specialization".to_string()))?,
        experience_years: row.try_get("experience_years").map_err(|_| AppError::MissingData("experience_years".to_string()))?,
        availability: row.try_get("availability").map_err(|_| AppError::MissingData("availability".to_string()))?,
        certifications: row.try_get("certifications").map_err(|_| AppError::MissingData("certifications".to_string()))?,
        submitted_at: row.try_get("submitted_at").map_err(|_| AppError::MissingData("submitted_at".to_string()))?,
    })
}

/// Inserts a new counselor application with status `pending`.
pub async fn create_application(
    pool: &Pool,
    id: Uuid,
    profile_id: Uuid,
    specialization: String,
    experience_years: i32,
    availability: String,
    certifications: String,
) -> Result<CounselorApplication> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO counselor_applications
                (id, profile_id, specialization, experience_years, availability, certifications)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
            &[
                &id,
                &profile_id,
                &specialization,
                &experience_years,
                &availability,
                &certifications,
            ],
        )
        .await?;
    row_to_application(&row)
}

/// Finds an application by its ID.
pub async fn find_by_id(pool: &Pool, application_id: &Uuid) -> Result<Option<CounselorApplication>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM counselor_applications
            WHERE id = $1
            "#,
            &[application_id],
        )
        .await?;
    row.map(|r| row_to_application(&r)).transpose()
}

/// Lists applications, newest first.
pub async fn list_applications(pool: &Pool) -> Result<Vec<CounselorApplication>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM counselor_applications
            ORDER BY submitted_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_application).collect()
}

/// Updates an application's status.
pub async fn update_status(
    pool: &Pool,
    application_id: &Uuid,
    status: ApplicationStatus,
) -> Result<Option<CounselorApplication>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE counselor_applications
            SET status = $1
            WHERE id = $2
            RETURNING *
            "#,
            &[&status, application_id],
        )
        .await?;
    row.map(|r| row_to_application(&r)).transpose()
}
