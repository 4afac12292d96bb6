//! Persisted ticket-list view state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, TicketDeskError};

/// Status filter value meaning "do not filter by status"
pub const ALL_STATUSES: &str = "all";

/// How the ticket list is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Cards,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(TicketDeskError::InvalidInput(format!(
                "Invalid sort order: '{s}'. Use asc or desc"
            ))),
        }
    }
}

impl FromStr for ViewMode {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(Self::List),
            "cards" => Ok(Self::Cards),
            "calendar" => Ok(Self::Calendar),
            _ => Err(TicketDeskError::InvalidInput(format!(
                "Invalid view mode: '{s}'. Use list, cards or calendar"
            ))),
        }
    }
}

/// Sortable columns, mapped onto the server's field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    Status,
    Priority,
    PlannedAt,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Name of the column in the server's `sort_by` parameter
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::PlannedAt => "planned_at",
            Self::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortField {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "planned" | "planned_at" => Ok(Self::PlannedAt),
            "created" | "created_at" => Ok(Self::CreatedAt),
            _ => Err(TicketDeskError::InvalidInput(format!(
                "Invalid sort field: '{s}'. Use id, title, status, priority, planned_at or created_at"
            ))),
        }
    }
}

/// Ticket list filters, persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketsFilters {
    pub search: String,
    pub view_mode: ViewMode,
    pub sort_order: SortOrder,
    pub sort_by: SortField,
    /// Either [`ALL_STATUSES`] or a status code
    pub status: String,
    pub buildings: Vec<i64>,
    pub planned_from: Option<NaiveDate>,
    pub planned_to: Option<NaiveDate>,
    pub page_size: u32,
}

impl Default for TicketsFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            view_mode: ViewMode::default(),
            sort_order: SortOrder::default(),
            sort_by: SortField::default(),
            status: ALL_STATUSES.to_string(),
            buildings: Vec::new(),
            planned_from: None,
            planned_to: None,
            page_size: 20,
        }
    }
}

impl TicketsFilters {
    /// Whether a status restriction is active
    #[must_use]
    pub fn filters_status(&self) -> bool {
        !self.status.is_empty() && self.status != ALL_STATUSES
    }

    /// Parse a `from..to` date range (either side may be empty)
    pub fn set_planned_range(&mut self, range: &str) -> Result<()> {
        let (from, to) = range.split_once("..").unwrap_or((range, range));
        self.planned_from = parse_optional_date(from)?;
        self.planned_to = parse_optional_date(to)?;
        if let (Some(from), Some(to)) = (self.planned_from, self.planned_to) {
            if from > to {
                return Err(TicketDeskError::InvalidInput(format!(
                    "Date range start {from} is after end {to}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TicketDeskError::InvalidInput(format!("Invalid date: {value}")))
}
