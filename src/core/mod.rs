//! Core data types shared by the API client, storage and CLI

mod builders;
mod filters;
mod ticket;

pub use builders::{TicketBuilder, TicketDraftBuilder};
pub use filters::{ALL_STATUSES, SortField, SortOrder, TicketsFilters, ViewMode};
pub use ticket::{
    Attachment, BuildingRef, Priority, Status, Ticket, TicketDraft, TicketId, TicketMessage,
    TicketPatch, TicketsPage, UserRef,
};
