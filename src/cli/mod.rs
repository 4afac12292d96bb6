//! Command-line front end
//!
//! Each subcommand maps onto one library operation; handlers live in
//! [`handlers`] and share a [`handlers::HandlerContext`].

mod commands;
pub mod handlers;
mod output;

pub use commands::{
    AdminCommands, AuthCommands, BotCommands, BuildingCommands, Cli, Commands,
    DepartmentCommands, FilterCommands, TicketCommands, UserCommands,
};
pub use output::{OutputFormat, OutputFormatter};
