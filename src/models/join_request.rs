//! Join request model
//!
//! A pending/approved/rejected request to join a group that requires
//! approval. The pending state is the only non-terminal one; the storage
//! layer enforces the single transition out of it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::errors::StudyBuddyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "pending",
            JoinRequestStatus::Approved => "approved",
            JoinRequestStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected requests accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JoinRequestStatus::Pending)
    }
}

impl FromStr for JoinRequestStatus {
    type Err = StudyBuddyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(JoinRequestStatus::Pending),
            "approved" => Ok(JoinRequestStatus::Approved),
            "rejected" => Ok(JoinRequestStatus::Rejected),
            other => Err(StudyBuddyError::Validation(
                format!("Unknown join request status: {}", other)
            )),
        }
    }
}

impl std::fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: Uuid,
    pub group_id: i64,
    pub user_id: i64,
    pub status: JoinRequestStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JoinRequestStatus::Pending,
            JoinRequestStatus::Approved,
            JoinRequestStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<JoinRequestStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<JoinRequestStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JoinRequestStatus::Pending.is_terminal());
        assert!(JoinRequestStatus::Approved.is_terminal());
        assert!(JoinRequestStatus::Rejected.is_terminal());
    }
}
