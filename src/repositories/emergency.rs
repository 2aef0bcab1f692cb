use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::emergency::EmergencyRequest,
};

fn row_to_request(row: &Row) -> Result<EmergencyRequest> {
    Ok(EmergencyRequest {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        client_id: row.try_get("client_id").map_err(|_| AppError::MissingData("client_id".to_string()))?,
        details: row.try_get("details").map_err(|_| AppError::MissingData("details".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        hotline_info: row.try_get("hotline_info").map_err(|_| AppError::MissingData("hotline_info".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a new emergency request.
pub async fn create_request(
    pool: &Pool,
    id: Uuid,
    client_id: Uuid,
    details: String,
    hotline_info: serde_json::Value,
) -> Result<EmergencyRequest> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO emergency_requests (id, client_id, details, hotline_info)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&id, &client_id, &details, &hotline_info],
        )
        .await?;
    row_to_request(&row)
}

/// Lists a client's emergency requests, newest first.
pub async fn list_for_client(pool: &Pool, client_id: &Uuid) -> Result<Vec<EmergencyRequest>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM emergency_requests
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#,
            &[client_id],
        )
        .await?;
    rows.iter().map(row_to_request).collect()
}
