//! Knowledge-base pages, tags, related tickets and system notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::list::{ListPayload, ListResult};
use crate::core::{Ticket, TicketId};
use crate::error::Result;

/// A rich-text page edited with the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub title: String,
    /// Serialized editor markup
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInput {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A banner-style notice published by administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemNotification {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub active_until: Option<DateTime<Utc>>,
}

impl SystemNotification {
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.active_until.is_none_or(|until| until > now)
    }
}

impl ApiClient {
    pub async fn list_pages(&self) -> Result<Vec<Page>> {
        let list: ListPayload<Page> = self.get("pages/").await?.into_data(self.locale())?;
        Ok(ListResult::from(list).items)
    }

    pub async fn get_page(&self, id: i64) -> Result<Page> {
        self.get(&format!("pages/{id}"))
            .await?
            .into_data(self.locale())
    }

    pub async fn create_page(&self, input: &PageInput) -> Result<Page> {
        self.post("pages/", input).await?.into_data(self.locale())
    }

    pub async fn update_page(&self, id: i64, input: &PageInput) -> Result<Page> {
        self.put(&format!("pages/{id}"), input)
            .await?
            .into_data(self.locale())
    }

    pub async fn delete_page(&self, id: i64) -> Result<()> {
        self.delete::<serde_json::Value>(&format!("pages/{id}"))
            .await?
            .into_result(self.locale())?;
        Ok(())
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let list: ListPayload<Tag> = self.get("tags/").await?.into_data(self.locale())?;
        Ok(ListResult::from(list).items)
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        self.post("tags/", &serde_json::json!({ "name": name.trim() }))
            .await?
            .into_data(self.locale())
    }

    /// Tickets the server considers related to `id`
    pub async fn related_tickets(&self, id: TicketId) -> Result<Vec<Ticket>> {
        let list: ListPayload<Ticket> = self
            .get(&format!("related/{id}"))
            .await?
            .into_data(self.locale())?;
        Ok(ListResult::from(list).items)
    }

    /// Currently published system notifications
    pub async fn system_notifications(&self) -> Result<Vec<SystemNotification>> {
        let all: Vec<SystemNotification> = self
            .get("system_notifications")
            .await?
            .into_result(self.locale())?
            .unwrap_or_default();
        let now = Utc::now();
        Ok(all.into_iter().filter(|n| n.is_active_at(now)).collect())
    }
}
