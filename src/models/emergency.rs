use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An urgent help request filed by a client.
///
/// `hotline_info` holds whatever the hotline lookup service returned at
/// creation time, or an error marker if the lookup failed. The lookup is
/// best-effort; its failure never blocks creating the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub details: String,
    pub status: String,
    pub hotline_info: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
