use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The role a profile plays on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "profile_role")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[postgres(name = "client")]
    Client,
    #[postgres(name = "counselor")]
    Counselor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Counselor => "counselor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "counselor" => Ok(Role::Counselor),
            _ => Err(()),
        }
    }
}

/// Represents a user's profile, client or counselor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// The unique identifier for the profile.
    pub id: Uuid,
    /// The ID of the account this profile belongs to.
    pub user_id: Uuid,
    /// The display name of the account holder.
    pub username: String,
    /// The profile's role.
    pub role: Role,
    /// A free-text biography.
    pub bio: String,
    /// The timestamp when the profile was created.
    pub created_at: DateTime<Utc>,
}

/// Client-specific details attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub preferences: Option<String>,
}

/// The review status of a counselor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "application_status")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[postgres(name = "pending")]
    Pending,
    #[postgres(name = "approved")]
    Approved,
    #[postgres(name = "rejected")]
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// An application submitted by a profile to become a counselor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselorApplication {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub status: ApplicationStatus,
    pub specialization: String,
    pub experience_years: i32,
    /// Free-text availability description supplied by the applicant.
    pub availability: String,
    pub certifications: String,
    pub submitted_at: DateTime<Utc>,
}
