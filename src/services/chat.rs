use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{chat::Message, profile::Profile},
    repositories::{chat as chat_repo, session as session_repo},
    state::AppState,
};

/// Posts a message into a session's chat room.
///
/// Only the session's client and counselor may post. The room is created
/// lazily on the first message.
pub async fn send_message(
    state: &AppState,
    caller: &Profile,
    session_id: Uuid,
    content: String,
) -> Result<Message> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    let session = session_repo::find_by_id(&state.db, &session_id)
        .await?
        .ok_or_else(|| AppError::Validation("Session does not exist.".to_string()))?;

    if !session.has_participant(caller.id) {
        return Err(AppError::Validation(
            "You are not a participant in this session.".to_string(),
        ));
    }

    let room = chat_repo::get_or_create_room(&state.db, Uuid::new_v4(), session_id).await?;
    chat_repo::create_message(&state.db, Uuid::new_v4(), room.id, caller.id, content).await
}

/// Lists a session's chat messages, oldest first.
///
/// A session that has not been written to yet has no room and returns an
/// empty list.
pub async fn list_messages(
    state: &AppState,
    caller: &Profile,
    session_id: Uuid,
) -> Result<Vec<Message>> {
    let session = session_repo::find_by_id(&state.db, &session_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !session.has_participant(caller.id) {
        return Err(AppError::Validation(
            "You are not a participant in this session.".to_string(),
        ));
    }

    match chat_repo::find_room_for_session(&state.db, &session_id).await? {
        Some(room) => chat_repo::list_messages(&state.db, &room.id).await,
        None => Ok(Vec::new()),
    }
}
