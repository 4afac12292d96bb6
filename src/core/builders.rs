use super::{Attachment, BuildingRef, Priority, Status, Ticket, TicketDraft, TicketId, UserRef};
use chrono::{DateTime, Utc};

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    title: Option<String>,
    description: Option<String>,
    author: Option<UserRef>,
    priority: Option<Priority>,
    status: Option<Status>,
    planned_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    assignee: Option<UserRef>,
    attachments: Vec<Attachment>,
    building: Option<BuildingRef>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn id(mut self, id: i64) -> Self {
        self.id = Some(TicketId(id));
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn author(mut self, id: i64, name: impl Into<String>) -> Self {
        self.author = Some(UserRef {
            id,
            name: name.into(),
        });
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set `planned_at` timestamp
    #[must_use]
    pub const fn planned_at(mut self, planned_at: DateTime<Utc>) -> Self {
        self.planned_at = Some(planned_at);
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn assignee(mut self, id: i64, name: impl Into<String>) -> Self {
        self.assignee = Some(UserRef {
            id,
            name: name.into(),
        });
        self
    }

    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    #[must_use]
    pub fn building(mut self, building: BuildingRef) -> Self {
        self.building = Some(building);
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        Ticket {
            id: self.id.unwrap_or(TicketId(0)),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            author: self.author.unwrap_or(UserRef {
                id: 0,
                name: String::new(),
            }),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            planned_at: self.planned_at,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            assignee: self.assignee,
            attachments: self.attachments,
            building: self.building,
        }
    }
}

/// Builder for the creation payload of a new ticket
#[derive(Default)]
pub struct TicketDraftBuilder {
    draft: TicketDraft,
}

impl TicketDraftBuilder {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            draft: TicketDraft {
                title: title.into(),
                ..TicketDraft::default()
            },
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = description.into();
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.draft.priority = priority;
        self
    }

    #[must_use]
    pub const fn planned_at(mut self, planned_at: DateTime<Utc>) -> Self {
        self.draft.planned_at = Some(planned_at);
        self
    }

    #[must_use]
    pub const fn building(mut self, building_id: i64) -> Self {
        self.draft.building_id = Some(building_id);
        self
    }

    /// Add a single tag
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.draft.tags.push(tag.into());
        self
    }

    pub fn build(self) -> TicketDraft {
        self.draft
    }
}
