//! REST client for the ticket-desk server
//!
//! [`ApiClient`] owns transport concerns (base URL, bearer token, cookies,
//! error mapping). Endpoint groups live in their own modules as further
//! `impl ApiClient` blocks.
//!
//! # 404 handling
//!
//! The ticket list and the admin lists treat 404 as "no results" and return
//! an empty single page. Every other endpoint reports 404 as an error.

mod account;
mod admin;
mod client;
mod content;
mod list;
mod query;
mod tickets;

pub use account::{Profile, ProfileUpdate};
pub use admin::{
    AdminResource, Bot, Building, CrudHelper, Department, NewBuilding, User, UserInvite,
};
pub use client::{API_PREFIX, ApiClient, ApiResponse, parse_response};
pub use content::{Page, PageInput, SystemNotification, Tag};
pub use list::{ListPayload, ListResult};
pub use query::{QueryParams, QueryValue, build_query};
pub use tickets::{AttachmentUpload, TicketStatistics, tickets_query};
