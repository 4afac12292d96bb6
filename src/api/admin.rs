//! Administration endpoints and the generic list/create/delete helper
//!
//! Bots, users, departments and buildings share one workflow: a paginated
//! searchable list plus create and delete actions that report their outcome
//! through a [`Notifier`].

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::list::{ListPayload, ListResult};
use super::query::QueryParams;
use crate::error::{Result, TicketDeskError};
use crate::i18n::MessageKey;
use crate::notify::{NotificationKind, Notifier};
use crate::state::ConstsStore;

/// An entity managed through the admin pages
pub trait AdminResource: DeserializeOwned + Clone + Send + Sync {
    /// Human-readable name used in log lines
    const LABEL: &'static str;

    /// Path of the list endpoint
    const LIST_PATH: &'static str;

    /// Path of the create endpoint
    const CREATE_PATH: &'static str;

    /// Path addressing a single item
    fn item_path(id: i64) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A chat bot that relays tickets from a messenger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department_id: Option<i64>,
}

impl AdminResource for Building {
    const LABEL: &'static str = "building";
    const LIST_PATH: &'static str = "buildings/";
    const CREATE_PATH: &'static str = "buildings/";

    fn item_path(id: i64) -> String {
        format!("buildings/{id}")
    }
}

impl AdminResource for Department {
    const LABEL: &'static str = "department";
    const LIST_PATH: &'static str = "departments/";
    const CREATE_PATH: &'static str = "departments/";

    fn item_path(id: i64) -> String {
        format!("departments/{id}")
    }
}

impl AdminResource for Bot {
    const LABEL: &'static str = "bot";
    const LIST_PATH: &'static str = "bots";
    const CREATE_PATH: &'static str = "bots";

    fn item_path(id: i64) -> String {
        format!("bots/{id}")
    }
}

impl AdminResource for User {
    const LABEL: &'static str = "user";
    const LIST_PATH: &'static str = "user/list";
    const CREATE_PATH: &'static str = "user/admin/invite";

    fn item_path(id: i64) -> String {
        format!("user/{id}")
    }
}

/// Payload for `user/admin/invite`
#[derive(Debug, Clone, Serialize)]
pub struct UserInvite {
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBuilding<'a> {
    pub code: &'a str,
    pub name: &'a str,
}

/// Paginated, searchable view over one admin resource
pub struct CrudHelper<T: AdminResource> {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    pub items: Vec<T>,
    pub page: u32,
    pub max_page: u32,
    pub search: String,
    pub is_loading: bool,
    pub has_error: bool,
}

impl<T: AdminResource> CrudHelper<T> {
    #[must_use]
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            items: Vec::new(),
            page: 1,
            max_page: 1,
            search: String::new(),
            is_loading: false,
            has_error: false,
        }
    }

    async fn fetch_page(&self, page: u32, search: &str) -> Result<ListResult<T>> {
        let mut query = QueryParams::new().with("page", page);
        if !search.is_empty() {
            query.push("search", search);
        }

        let response = self
            .client
            .get_with_query::<ListPayload<T>>(T::LIST_PATH, &query)
            .await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(ListResult::empty());
        }
        Ok(response.into_data(self.client.locale())?.into())
    }

    /// Load one page of items
    ///
    /// Never fails: a 404 yields an empty page, any other failure sets
    /// `has_error` and emits an error notification.
    pub async fn load_items(&mut self, page: u32, search: &str) {
        let page = page.max(1);
        let search = search.trim().to_string();
        self.is_loading = true;
        self.has_error = false;

        match self.fetch_page(page, &search).await {
            Ok(list) => self.apply(list),
            Err(e) if e.is_not_found() => self.apply(ListResult::empty()),
            Err(e) => {
                tracing::warn!("Failed to load {} list: {}", T::LABEL, e);
                self.has_error = true;
                let message = self.failure_message(&e, MessageKey::LoadFailed);
                self.notifier.notify(NotificationKind::Error, &message);
            },
        }

        self.page = page;
        self.search = search;
        self.is_loading = false;
    }

    fn apply(&mut self, list: ListResult<T>) {
        self.items = list.items;
        self.max_page = list.max_page;
    }

    /// Create an item, notify the outcome, and reload the current page on success
    pub async fn create_item<B>(&mut self, body: &B) -> Result<Option<T>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let result = self
            .client
            .post::<B, serde_json::Value>(T::CREATE_PATH, body)
            .await
            .and_then(|response| response.into_result(self.client.locale()))
            .map(created_record::<T>);

        match result {
            Ok(created) => {
                tracing::info!("Created {}", T::LABEL);
                let message = self.client.locale().text(MessageKey::Created);
                self.notifier.notify(NotificationKind::Success, message);
                self.reload().await;
                Ok(created)
            },
            Err(e) => {
                let message = self.failure_message(&e, MessageKey::CreateFailed);
                self.notifier.notify(NotificationKind::Error, &message);
                Err(e)
            },
        }
    }

    /// Delete an item by id, notify the outcome, and reload on success
    pub async fn delete_item(&mut self, id: i64) -> Result<()> {
        let result = self
            .client
            .delete::<serde_json::Value>(&T::item_path(id))
            .await
            .and_then(|response| response.into_result(self.client.locale()));

        match result {
            Ok(_) => {
                tracing::info!("Deleted {} {}", T::LABEL, id);
                let message = self.client.locale().text(MessageKey::Deleted);
                self.notifier.notify(NotificationKind::Success, message);
                self.reload().await;
                Ok(())
            },
            Err(e) => {
                let message = self.failure_message(&e, MessageKey::DeleteFailed);
                self.notifier.notify(NotificationKind::Error, &message);
                Err(e)
            },
        }
    }

    async fn reload(&mut self) {
        let search = self.search.clone();
        self.load_items(self.page, &search).await;
    }

    fn failure_message(&self, error: &TicketDeskError, fallback: MessageKey) -> String {
        match error {
            TicketDeskError::Http { message, .. } | TicketDeskError::Api(message) => {
                message.clone()
            },
            _ => self.client.locale().text(fallback).to_string(),
        }
    }
}

impl ApiClient {
    pub async fn list_buildings(&self) -> Result<Vec<Building>> {
        self.list_all::<Building>().await
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        self.list_all::<Department>().await
    }

    /// Unpaginated fetch of a whole resource list; 404 means empty
    async fn list_all<T: AdminResource>(&self) -> Result<Vec<T>> {
        let response = self.get::<ListPayload<T>>(T::LIST_PATH).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        Ok(ListResult::from(response.into_data(self.locale())?).items)
    }

    /// Create a building and refresh the shared consts on success
    pub async fn create_building(
        &self,
        consts: &ConstsStore,
        code: &str,
        name: &str,
    ) -> Result<Option<Building>> {
        let body = NewBuilding {
            code: code.trim(),
            name: name.trim(),
        };
        if body.code.is_empty() || body.name.is_empty() {
            return Err(TicketDeskError::InvalidInput(
                "Building code and name are required".to_string(),
            ));
        }

        let created = self
            .post::<_, serde_json::Value>(Building::CREATE_PATH, &body)
            .await?
            .into_result(self.locale())
            .map(created_record::<Building>)?;
        tracing::info!("Created building {}", body.code);
        consts.refresh(self).await?;
        Ok(created)
    }

    pub async fn delete_building(&self, consts: &ConstsStore, id: i64) -> Result<()> {
        self.delete::<serde_json::Value>(&Building::item_path(id))
            .await?
            .into_result(self.locale())?;
        consts.refresh(self).await
    }

    pub async fn create_department(&self, consts: &ConstsStore, name: &str) -> Result<()> {
        self.post::<_, serde_json::Value>(
            Department::CREATE_PATH,
            &serde_json::json!({ "name": name.trim() }),
        )
        .await?
        .into_result(self.locale())?;
        consts.refresh(self).await
    }

    pub async fn invite_user(&self, invite: &UserInvite) -> Result<()> {
        self.post::<_, serde_json::Value>(User::CREATE_PATH, invite)
            .await?
            .into_result(self.locale())?;
        tracing::info!("Invited {}", invite.email);
        Ok(())
    }
}

/// The created record, when the success body carries one
///
/// Servers answer a create with the record, a `{data: record}` envelope, or
/// just `{success: true}`; only the first two yield a value.
fn created_record<T: DeserializeOwned>(body: Option<serde_json::Value>) -> Option<T> {
    let body = body?;
    let record = match body.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => body,
    };
    serde_json::from_value(record).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Building::LIST_PATH, "buildings/");
        assert_eq!(User::LIST_PATH, "user/list");
        assert_eq!(User::CREATE_PATH, "user/admin/invite");
        assert_eq!(Bot::item_path(4), "bots/4");
    }

    #[test]
    fn test_new_building_body() {
        let body = NewBuilding {
            code: "A",
            name: "B",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"code": "A", "name": "B"})
        );
    }

    #[test]
    fn test_created_record_shapes() {
        let full = serde_json::json!({"id": 1, "code": "A", "name": "B"});
        let wrapped = serde_json::json!({"success": true, "data": full.clone()});
        let bare = serde_json::json!({"success": true, "status": 201});

        assert_eq!(created_record::<Building>(Some(full)).map(|b| b.id), Some(1));
        assert_eq!(created_record::<Building>(Some(wrapped)).map(|b| b.id), Some(1));
        assert!(created_record::<Building>(Some(bare)).is_none());
        assert!(created_record::<Building>(None).is_none());
    }
}
