//! ticket-desk - client library for a ticket-management service desk
//!
//! This crate provides the client side of the service desk:
//! - A typed REST client for tickets, chat messages and administration
//! - Persisted ticket-list filters, auth tokens and a statistics cache
//! - Undo history and formatting commands for the rich-text page editor
//! - Message polling, notifications and a modal focus trap
//! - A honeypot check for public forms

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::map_unwrap_or)]

//! # Failure model
//!
//! API calls return [`Result`] and carry the server's own error text when
//! it sends one. Editor commands, notifications and focus handling never
//! fail: they report `false` or do nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ticket_desk::api::ApiClient;
//! use ticket_desk::config::Config;
//! use ticket_desk::state::FiltersStore;
//! use ticket_desk::storage::FileStore;
//!
//! # async fn demo() -> ticket_desk::Result<()> {
//! let config = Config::load_or_default()?;
//! let store = Arc::new(FileStore::new(config.storage_path()));
//! let client = ApiClient::new(&config.api, config.ui.locale)?.with_tokens(store.clone());
//!
//! let filters = FiltersStore::load(store)?;
//! let page = client.fetch_tickets(&filters.get(), 1).await?;
//! println!("{} tickets on {} pages", page.items.len(), page.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod captcha;
pub mod cli;
pub mod config;
pub mod core;
pub mod editor;
pub mod error;
pub mod i18n;
pub mod messages;
pub mod notify;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{Result, TicketDeskError};
