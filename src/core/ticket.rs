use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TicketDeskError;

/// Server-assigned ticket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub i64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<i64>()
            .map(Self)
            .map_err(|_| TicketDeskError::InvalidInput(format!("Invalid ticket id: {s}")))
    }
}

/// Ticket lifecycle state as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    OnHold,
    Closed,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Wire code used in query parameters
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Closed | Self::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "on_hold" => Ok(Self::OnHold),
            "closed" => Ok(Self::Closed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(TicketDeskError::InvalidInput(format!("Invalid status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(TicketDeskError::InvalidInput(format!("Invalid priority: {s}"))),
        }
    }
}

/// Minimal user reference embedded in tickets and messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRef {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// File attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// A support/service request, owned by the server
///
/// The client never mutates a ticket in place; updates go through the API
/// and the refreshed record replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: UserRef,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub planned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub building: Option<BuildingRef>,
}

/// Fields sent when creating a ticket (the `fields` multipart part)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

/// Partial update for an existing ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_at: Option<DateTime<Utc>>,
}

/// One page of tickets
#[derive(Debug, Clone, PartialEq)]
pub struct TicketsPage {
    pub items: Vec<Ticket>,
    pub total_pages: u32,
}

impl TicketsPage {
    /// The result used when the server reports no matches
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }
}

/// A message in a ticket's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub id: i64,
    pub author: UserRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": 42,
            "title": "Printer on fire",
            "author": {"id": 1, "name": "Ann"},
            "status": "in_progress",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, TicketId(42));
        assert_eq!(ticket.status, Status::InProgress);
        assert_eq!(ticket.priority, Priority::Medium);
        assert!(ticket.assignee.is_none());
        assert!(ticket.attachments.is_empty());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: Status = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(status, Status::Unknown);
    }

    #[test]
    fn test_parse_status_and_priority() {
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("sometime".parse::<Status>().is_err());
        assert_eq!("#17".parse::<TicketId>().unwrap(), TicketId(17));
    }

    #[test]
    fn test_draft_skips_empty_fields() {
        let draft = TicketDraft {
            title: "t".into(),
            ..TicketDraft::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("planned_at").is_none());
        assert!(value.get("tags").is_none());
        assert_eq!(value["priority"], "medium");
    }
}
