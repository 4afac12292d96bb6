//! Ticket endpoints

use std::path::Path;

use chrono::{Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use reqwest::{StatusCode, multipart};
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::list::{ListPayload, ListResult};
use super::query::QueryParams;
use crate::core::{
    Ticket, TicketDraft, TicketId, TicketMessage, TicketPatch, TicketsFilters, TicketsPage,
};
use crate::error::{Result, TicketDeskError};
use crate::storage::{KeyValueStore, PUBLIC_STATS_KEY, PUBLIC_STATS_TTL_MINUTES, TtlCache};

/// A file to upload with a new ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Read an attachment from disk, guessing the content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TicketDeskError::InvalidInput(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Public ticket counters shown on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub closed: u64,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct AssignBody {
    user_id: i64,
}

/// Start of `date` in `tz`, as RFC3339
fn day_start<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Last millisecond of `date` in `tz`, as RFC3339
fn day_end<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let naive = date.and_hms_milli_opt(23, 59, 59, 999)?;
    tz.from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Compose the ticket-list query from persisted filters
///
/// Date bounds are interpreted as whole days in `tz`.
pub fn tickets_query<Tz: TimeZone>(filters: &TicketsFilters, page: u32, tz: &Tz) -> QueryParams
where
    Tz::Offset: std::fmt::Display,
{
    let mut params = QueryParams::new()
        .with("page", page.max(1))
        .with("page_size", filters.page_size.max(1))
        .with("sort_by", filters.sort_by.api_name())
        .with("sort_order", filters.sort_order.as_str());

    if filters.filters_status() {
        let statuses: Vec<String> = filters
            .status
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        params.push("statuses", statuses);
    }

    params.push_opt(
        "planned_from",
        filters.planned_from.and_then(|d| day_start(d, tz)),
    );
    params.push_opt("planned_to", filters.planned_to.and_then(|d| day_end(d, tz)));

    if !filters.buildings.is_empty() {
        params.push("buildings", filters.buildings.clone());
    }

    let search = filters.search.trim();
    if !search.is_empty() {
        params.push("search", search);
    }

    params
}

impl ApiClient {
    /// Fetch one page of tickets matching `filters`
    ///
    /// A 404 means "nothing matched" and yields an empty single page.
    pub async fn fetch_tickets(&self, filters: &TicketsFilters, page: u32) -> Result<TicketsPage> {
        let query = tickets_query(filters, page, &Local);
        let response = self
            .get_with_query::<ListPayload<Ticket>>("tickets/", &query)
            .await?;

        if response.status == StatusCode::NOT_FOUND {
            tracing::debug!("Ticket query matched nothing");
            return Ok(TicketsPage::empty());
        }

        let list = ListResult::from(response.into_data(self.locale())?);
        Ok(TicketsPage {
            items: list.items,
            total_pages: list.max_page,
        })
    }

    pub async fn fetch_ticket(&self, id: TicketId) -> Result<Ticket> {
        self.get(&format!("tickets/{id}"))
            .await?
            .into_data(self.locale())
    }

    /// Create a ticket; `fields` goes as a JSON part, files as `attachments` parts
    pub async fn create_ticket(
        &self,
        draft: &TicketDraft,
        attachments: Vec<AttachmentUpload>,
    ) -> Result<Ticket> {
        let fields = multipart::Part::text(serde_json::to_string(draft)?)
            .mime_str("application/json")?;
        let mut form = multipart::Form::new().part("fields", fields);

        for attachment in attachments {
            let part = multipart::Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.content_type)?;
            form = form.part("attachments", part);
        }

        let ticket: Ticket = self
            .post_multipart("tickets/", form)
            .await?
            .into_data(self.locale())?;
        tracing::info!("Created ticket #{}", ticket.id);
        Ok(ticket)
    }

    pub async fn update_ticket(&self, id: TicketId, patch: &TicketPatch) -> Result<Ticket> {
        self.patch(&format!("tickets/{id}"), patch)
            .await?
            .into_data(self.locale())
    }

    pub async fn delete_ticket(&self, id: TicketId) -> Result<()> {
        self.delete::<serde_json::Value>(&format!("tickets/{id}"))
            .await?
            .into_result(self.locale())?;
        tracing::info!("Deleted ticket #{}", id);
        Ok(())
    }

    pub async fn fetch_messages(&self, id: TicketId) -> Result<Vec<TicketMessage>> {
        self.get(&format!("tickets/{id}/messages"))
            .await?
            .into_data(self.locale())
    }

    pub async fn send_message(&self, id: TicketId, text: &str) -> Result<TicketMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TicketDeskError::InvalidInput(
                "Message text must not be empty".to_string(),
            ));
        }
        self.post(&format!("tickets/{id}/messages"), &MessageBody { text })
            .await?
            .into_data(self.locale())
    }

    pub async fn assign_ticket(&self, id: TicketId, user_id: i64) -> Result<()> {
        self.post::<_, serde_json::Value>(&format!("tickets/{id}/assign"), &AssignBody { user_id })
            .await?
            .into_result(self.locale())?;
        Ok(())
    }

    pub async fn unassign_ticket(&self, id: TicketId) -> Result<()> {
        self.post::<_, serde_json::Value>(
            &format!("tickets/{id}/unassign"),
            &serde_json::json!({}),
        )
        .await?
        .into_result(self.locale())?;
        Ok(())
    }

    /// Public statistics, served from a 15-minute cache when possible
    pub async fn public_statistics<S>(&self, store: &S) -> Result<TicketStatistics>
    where
        S: KeyValueStore + ?Sized,
    {
        let cache = TtlCache::new(
            store,
            PUBLIC_STATS_KEY,
            chrono::Duration::minutes(PUBLIC_STATS_TTL_MINUTES),
        );
        let now = Utc::now();
        if let Some(stats) = cache.get_fresh(now)? {
            tracing::debug!("Using cached ticket statistics");
            return Ok(stats);
        }

        let stats: TicketStatistics = self
            .get("tickets/statistics")
            .await?
            .into_data(self.locale())?;
        cache.put(&stats, now)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{QueryValue, build_query};
    use crate::core::{SortField, SortOrder};

    #[test]
    fn test_default_filters_query() {
        let query = tickets_query(&TicketsFilters::default(), 1, &Utc);
        assert_eq!(
            build_query(&query),
            "page=1&page_size=20&sort_by=created_at&sort_order=desc"
        );
    }

    #[test]
    fn test_full_filters_query() {
        let mut filters = TicketsFilters::default();
        filters.status = "open,in_progress".to_string();
        filters.sort_by = SortField::PlannedAt;
        filters.sort_order = SortOrder::Asc;
        filters.buildings = vec![3, 5];
        filters.search = "  projector ".to_string();
        filters.set_planned_range("2024-05-01..2024-05-31").unwrap();

        let query = tickets_query(&filters, 2, &Utc);
        assert_eq!(
            query.get("planned_from"),
            Some(&QueryValue::Text("2024-05-01T00:00:00.000Z".to_string()))
        );
        assert_eq!(
            query.get("planned_to"),
            Some(&QueryValue::Text("2024-05-31T23:59:59.999Z".to_string()))
        );

        let encoded = build_query(&query);
        assert!(encoded.starts_with("page=2&page_size=20&sort_by=planned_at&sort_order=asc"));
        assert!(encoded.contains("statuses[]=open&statuses[]=in_progress"));
        assert!(encoded.contains("buildings[]=3&buildings[]=5"));
        assert!(encoded.ends_with("search=projector"));
    }

    #[test]
    fn test_all_status_is_not_sent() {
        let mut filters = TicketsFilters::default();
        filters.status = "all".to_string();
        let query = tickets_query(&filters, 1, &Utc);
        assert!(query.get("statuses").is_none());
    }

    #[test]
    fn test_day_bounds_follow_timezone() {
        let tz = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            day_start(date, &tz).unwrap(),
            "2024-01-10T00:00:00.000+03:00"
        );
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(guess_content_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
    }
}
