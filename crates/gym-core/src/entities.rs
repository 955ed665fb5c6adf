// Gym domain types
//
// Every persisted entity shares the base record shape (id, createdAt, updatedAt).
// Records are stored as camelCase JSON; no schema version is written.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record stored in a collection
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn id(&self) -> i64;
}

/// Identifier for a record created at `now`.
///
/// Ids come from the caller, never from the store; uniqueness is the caller's concern.
pub fn generate_id(now: DateTime<Utc>) -> i64 {
    now.timestamp_millis()
}

/// Class lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    Open,
    OnGoing,
    Full,
    Finished,
    Canceled,
}

impl ClassStatus {
    pub const ALL: [ClassStatus; 5] = [
        ClassStatus::OnGoing,
        ClassStatus::Open,
        ClassStatus::Full,
        ClassStatus::Finished,
        ClassStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Open => "OPEN",
            ClassStatus::OnGoing => "ON_GOING",
            ClassStatus::Full => "FULL",
            ClassStatus::Finished => "FINISHED",
            ClassStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClassStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ClassStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown class status: {s}"))
    }
}

/// Postal address of a member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A gym member on the roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub birth_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub payment_plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Member {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A scheduled class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    pub description: String,
    pub max_capacity: u32,
    pub allow_late_registration: bool,
    pub date: DateTime<Utc>,
    pub status: ClassStatus,
    #[serde(rename = "type")]
    pub class_type: String,
    /// Enrolled members; never more than `max_capacity` once stored through the class API
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        (self.max_capacity as usize).saturating_sub(self.members.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    pub fn has_member(&self, member_id: i64) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    /// Whether the class takes new enrollments: open or running, with late registration allowed
    pub fn accepts_new_members(&self) -> bool {
        matches!(self.status, ClassStatus::Open | ClassStatus::OnGoing)
            && self.allow_late_registration
    }
}

impl Record for Class {
    fn id(&self) -> i64 {
        self.id
    }
}
