//! Test fixtures shared across unit tests

#![cfg(test)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use crate::auth::{TokenPair, make_token};
use crate::core::{Priority, Status, Ticket, TicketBuilder};
use crate::storage::{FileStore, TokenStorage};

/// Temporary file-backed store
pub struct TestStore {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub store: Arc<FileStore>,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("storage.json");
        let store = Arc::new(FileStore::new(&path));
        Self {
            temp_dir,
            path,
            store,
        }
    }

    /// Store with a session whose access token is valid for an hour
    pub fn logged_in() -> Self {
        let test_store = Self::new();
        let now = Utc::now().timestamp();
        test_store
            .store
            .store_tokens(&TokenPair {
                access_token: make_token(now + 3600),
                refresh_token: Some(make_token(now + 86_400)),
            })
            .expect("Failed to store tokens");
        test_store
    }
}

pub fn create_test_ticket(id: i64, title: &str, priority: Priority, status: Status) -> Ticket {
    TicketBuilder::new()
        .id(id)
        .title(title)
        .description(format!("Description of {title}"))
        .author(1, "Test Author")
        .priority(priority)
        .status(status)
        .created_at(Utc::now() - Duration::days(id))
        .build()
}

/// A small mixed set of tickets
pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        create_test_ticket(1, "Printer jammed", Priority::High, Status::Open),
        create_test_ticket(2, "Replace lamp", Priority::Low, Status::InProgress),
        create_test_ticket(3, "VPN access", Priority::Medium, Status::Closed),
    ]
}

#[test]
fn test_logged_in_store_has_tokens() {
    let test_store = TestStore::logged_in();
    assert!(test_store.store.access_token().unwrap().is_some());
    assert!(test_store.store.refresh_token().unwrap().is_some());
    assert!(test_store.path.exists());
}
