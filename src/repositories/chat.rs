use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::chat::{ChatRoom, Message},
};

fn row_to_room(row: &Row) -> Result<ChatRoom> {
    Ok(ChatRoom {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        session_id: row.try_get("session_id").map_err(|_| AppError::MissingData("session_id".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

fn row_to_message(row: &Row) -> Result<Message> {
    Ok(Message {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        room_id: row.try_get("room_id").map_err(|_| AppError::MissingData("room_id".to_string()))?,
        sender_id: row.try_get("sender_id").map_err(|_| AppError::MissingData("sender_id".to_string()))?,
        content: row.try_get("content").map_err(|_| AppError::MissingData("content".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Fetches the session's chat room, creating it on first use.
///
/// The upsert keeps concurrent first messages from creating two rooms; the
/// no-op update lets the statement return the existing row.
pub async fn get_or_create_room(pool: &Pool, id: Uuid, session_id: Uuid) -> Result<ChatRoom> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO chat_rooms (id, session_id)
            VALUES ($1, $2)
            ON CONFLICT (session_id) DO UPDATE SET session_id = EXCLUDED.session_id
            RETURNING *
            "#,
            &[&id, &session_id],
        )
        .await?;
    row_to_room(&row)
}

/// Finds the chat room for a session, if one exists yet.
pub async fn find_room_for_session(pool: &Pool, session_id: &Uuid) -> Result<Option<ChatRoom>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM chat_rooms
            WHERE session_id = $1
            "#,
            &[session_id],
        )
        .await?;
    row.map(|r| row_to_room(&r)).transpose()
}

/// Inserts a message into a room.
pub async fn create_message(
    pool: &Pool,
    id: Uuid,
    room_id: Uuid,
    sender_id: Uuid,
    content: String,
) -> Result<Message> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO messages (id, room_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&id, &room_id, &sender_id, &content],
        )
        .await?;
    row_to_message(&row)
}

/// Lists a room's messages, oldest first.
pub async fn list_messages(pool: &Pool, room_id: &Uuid) -> Result<Vec<Message>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM messages
            WHERE room_id = $1
            ORDER BY created_at ASC
            "#,
            &[room_id],
        )
        .await?;
    rows.iter().map(row_to_message).collect()
}
