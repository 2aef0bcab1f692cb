use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The lifecycle status of a counseling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "session_status")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[postgres(name = "pending")]
    Pending,
    #[postgres(name = "confirmed")]
    Confirmed,
    #[postgres(name = "completed")]
    Completed,
    #[postgres(name = "cancelled")]
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Confirmed => "confirmed",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a session in this status still occupies its time slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, SessionStatus::Pending | SessionStatus::Confirmed)
    }

    /// The legal lifecycle transitions.
    ///
    /// pending may be confirmed or cancelled; confirmed may be completed or
    /// cancelled; completed and cancelled are terminal.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SessionStatus::Pending),
            "confirmed" => Ok(SessionStatus::Confirmed),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// One scheduled counseling appointment between a client and a counselor.
///
/// Sessions are never deleted; cancelled and completed rows are retained for
/// review and chat linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The counselor the session is booked with.
    pub counselor_id: Uuid,
    /// The client who booked the session.
    pub client_id: Uuid,
    /// The scheduled instant of the session.
    pub datetime: DateTime<Utc>,
    /// The current lifecycle status.
    pub status: SessionStatus,
    /// Free-text notes attached at booking time.
    pub notes: String,
    /// The timestamp when the session row was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the given profile takes part in this session.
    pub fn has_participant(&self, profile_id: Uuid) -> bool {
        self.client_id == profile_id || self.counselor_id == profile_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_confirmed_or_cancelled() {
        assert!(SessionStatus::Pending.can_transition_to(SessionStatus::Confirmed));
        assert!(SessionStatus::Pending.can_transition_to(SessionStatus::Cancelled));
        assert!(!SessionStatus::Pending.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::Pending.can_transition_to(SessionStatus::Pending));
    }

    #[test]
    fn confirmed_can_be_completed_or_cancelled() {
        assert!(SessionStatus::Confirmed.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Confirmed.can_transition_to(SessionStatus::Cancelled));
        assert!(!SessionStatus::Confirmed.can_transition_to(SessionStatus::Pending));
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        for terminal in [SessionStatus::Completed, SessionStatus::Cancelled] {
            for next in [
                SessionStatus::Pending,
                SessionStatus::Confirmed,
                SessionStatus::Completed,
                SessionStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn only_pending_and_confirmed_block_a_slot() {
        assert!(SessionStatus::Pending.blocks_slot());
        assert!(SessionStatus::Confirmed.blocks_slot());
        assert!(!SessionStatus::Completed.blocks_slot());
        assert!(!SessionStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::Confirmed,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>(), Ok(status));
        }
        assert!("archived".parse::<SessionStatus>().is_err());
    }
}
