use deadpool_postgres::Pool;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::profile::{ClientProfile, Profile, Role},
};

/// A helper function to map a `tokio_postgres::Row` to a `Profile`.
fn row_to_profile(row: &Row) -> Result<Profile> {
    Ok(Profile {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        user_id: row.try_get("user_id").map_err(|_| AppError::MissingData("user_id".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        role: row.try_get("role").map_err(|_| AppError::MissingData("role".to_string()))?,
        bio: row.try_get("bio").map_err(|_| AppError::MissingData("bio".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

fn row_to_client_profile(row: &Row) -> Result<ClientProfile> {
    Ok(ClientProfile {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        profile_id: row.try_get("profile_id").map_err(|_| AppError::MissingData("profile_id".to_string()))?,
        age: row.try_get("age").map_err(|_| AppError::MissingData("age".to_string()))?,
        gender: row.try_get("gender").map_err(|_| AppError::MissingData("gender".to_string()))?,
        preferences: row.try_get("preferences").map_err(|_| AppError::MissingData("preferences".to_string()))?,
    })
}

/// Creates a new profile in the database.
///
/// The unique constraint on `user_id` backs the one-profile-per-account
/// rule under concurrency; a violation surfaces as the same validation
/// error the service's pre-check produces.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `id` - The unique identifier for the profile.
/// * `user_id` - The ID of the owning account.
/// * `username` - The account's display name.
/// * `role` - The profile's role.
/// * `bio` - A free-text biography.
///
/// # Returns
///
/// A `Result` containing the created `Profile`.
pub async fn create_profile(
    pool: &Pool,
    id: Uuid,
    user_id: Uuid,
    username: String,
    role: Role,
    bio: String,
) -> Result<Profile> {
    let client = pool.get().await?;
    let inserted = client
        .query_one(
            r#"
            INSERT INTO profiles (id, user_id, username, role, bio)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&id, &user_id, &username, &role, &bio],
        )
        .await;

    match inserted {
        Ok(row) => row_to_profile(&row),
        Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(AppError::Validation(
            "This account already has a profile.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Finds a profile by its ID.
pub async fn find_by_id(pool: &Pool, profile_id: &Uuid) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM profiles
            WHERE id = $1
            "#,
            &[profile_id],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Finds the profile owned by the given account.
pub async fn find_by_user(pool: &Pool, user_id: &Uuid) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM profiles
            WHERE user_id = $1
            "#,
            &[user_id],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Lists profiles, optionally filtered by role.
pub async fn list_profiles(pool: &Pool, role: Option<Role>) -> Result<Vec<Profile>> {
    let client = pool.get().await?;
    let rows = match role {
        Some(role) => {
            client
                .query(
                    r#"
                    SELECT *
                    FROM profiles
                    WHERE role = $1
                    ORDER BY created_at ASC
                    "#,
                    &[&role],
                )
                .await?
        }
        None => {
            client
                .query(
                    r#"
                    SELECT *
                    FROM profiles
                    ORDER BY created_at ASC
                    "#,
                    &[],
                )
                .await?
        }
    };
    rows.iter().map(row_to_profile).collect()
}

/// Updates a profile's biography.
pub async fn update_bio(pool: &Pool, profile_id: &Uuid, bio: String) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE profiles
            SET bio = $1
            WHERE id = $2
            RETURNING *
            "#,
            &[&bio, profile_id],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Changes a profile's role.
pub async fn set_role(pool: &Pool, profile_id: &Uuid, role: Role) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE profiles
            SET role = $1
            WHERE id = $2
            RETURNING *
            "#,
            &[&role, profile_id],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Creates the client-specific detail record for a profile.
///
/// The unique constraint on `profile_id` keeps the record 1:1 with its
/// profile under concurrency; a violation surfaces as the same validation
/// error the service's pre-check produces.
pub async fn create_client_profile(
    pool: &Pool,
    id: Uuid,
    profile_id: Uuid,
    age: i32,
    gender: String,
    preferences: Option<String>,
) -> Result<ClientProfile> {
    let client = pool.get().await?;
    let inserted = client
        .query_one(
            r#"
            INSERT INTO client_profiles (id, profile_id, age, gender, preferences)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&id, &profile_id, &age, &gender, &preferences],
        )
        .await;

    match inserted {
        Ok(row) => row_to_client_profile(&row),
        Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(AppError::Validation(
            "This profile already has client details.".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Finds the client detail record for a profile.
pub async fn find_client_profile(pool: &Pool, profile_id: &Uuid) -> Result<Option<ClientProfile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM client_profiles
            WHERE profile_id = $1
            "#,
            &[profile_id],
        )
        .await?;
    row.map(|r| row_to_client_profile(&r)).transpose()
}

/// Lists all client detail records.
pub async fn list_client_profiles(pool: &Pool) -> Result<Vec<ClientProfile>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM client_profiles
            ORDER BY id ASC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_client_profile).collect()
}
