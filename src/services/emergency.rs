use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{emergency::EmergencyRequest, profile::{Profile, Role}},
    repositories::emergency as emergency_repo,
    state::AppState,
};

/// Files an emergency request for a client.
///
/// The hotline lookup is best-effort: a failed or non-2xx call stores an
/// error marker in `hotline_info` and the request is still created.
pub async fn create_request(
    state: &AppState,
    caller: &Profile,
    details: String,
) -> Result<EmergencyRequest> {
    if caller.role != Role::Client {
        return Err(AppError::Validation(
            "Only clients can create emergency requests.".to_string(),
        ));
    }

    let hotline_info = fetch_hotline_info(state).await;

    emergency_repo::create_request(&state.db, Uuid::new_v4(), caller.id, details, hotline_info)
        .await
}

/// Lists the caller's emergency requests.
pub async fn list_requests(state: &AppState, caller: &Profile) -> Result<Vec<EmergencyRequest>> {
    emergency_repo::list_for_client(&state.db, &caller.id).await
}

async fn fetch_hotline_info(state: &AppState) -> serde_json::Value {
    let fallback = serde_json::json!({
        "error": "Could not fetch hotline info at this time."
    });

    match state.http.get(&state.config.hotline_api_url).send().await {
        Ok(response) if response.status().is_success() => {
            response.json::<serde_json::Value>().await.unwrap_or_else(|e| {
                tracing::warn!("Hotline service returned invalid JSON: {}", e);
                fallback
            })
        }
        Ok(response) => {
            tracing::warn!("Hotline service returned status {}", response.status());
            fallback
        }
        Err(e) => {
            tracing::warn!("Hotline service unreachable: {}", e);
            fallback
        }
    }
}
