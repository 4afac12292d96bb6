use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::{Priority, SortField, SortOrder, Status, TicketId, ViewMode};

/// Command-line client for the ticket-desk service desk
#[derive(Parser, Debug)]
#[command(name = "ticket-desk", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TICKET_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, conflicts_with = "yaml")]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true)]
    pub yaml: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with tickets
    Tickets {
        #[command(subcommand)]
        command: TicketCommands,
    },

    /// Administer buildings, departments, users and bots
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Manage the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Inspect or change the saved ticket-list filters
    Filters {
        #[command(subcommand)]
        command: FilterCommands,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// List tickets using the saved filters
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Override the saved search text for this call
        #[arg(short, long)]
        search: Option<String>,

        /// Override the saved status filter (comma-separated, or "all")
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one ticket
    Show { id: TicketId },

    /// Create a ticket
    Create {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Planned date (YYYY-MM-DD)
        #[arg(long)]
        planned: Option<String>,

        #[arg(long)]
        building: Option<i64>,

        /// File to attach; may be repeated
        #[arg(short, long = "attach")]
        attachments: Vec<PathBuf>,
    },

    /// Change fields of a ticket
    Update {
        id: TicketId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        status: Option<Status>,

        #[arg(long)]
        priority: Option<Priority>,
    },

    Delete { id: TicketId },

    /// Assign a ticket to a user
    Assign { id: TicketId, user_id: i64 },

    Unassign { id: TicketId },

    /// Print the chat of a ticket
    Messages {
        id: TicketId,

        /// Keep polling for new messages until interrupted
        #[arg(short, long)]
        follow: bool,
    },

    /// Post a chat message to a ticket
    Send { id: TicketId, text: String },

    /// Public ticket counters (cached for 15 minutes)
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    Buildings {
        #[command(subcommand)]
        command: BuildingCommands,
    },
    Departments {
        #[command(subcommand)]
        command: DepartmentCommands,
    },
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    Bots {
        #[command(subcommand)]
        command: BotCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BuildingCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    Create { code: String, name: String },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum DepartmentCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    Create { name: String },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Send an invitation e-mail
    Invite {
        email: String,
        #[arg(long, default_value = "user")]
        role: String,
        #[arg(long)]
        department: Option<i64>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum BotCommands {
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store tokens issued by the server
    Login {
        access_token: String,
        #[arg(long)]
        refresh_token: Option<String>,
    },

    /// Forget the stored tokens
    Logout,

    /// Report the stored session and refresh it if needed
    Status,

    /// Check whether a token is well-formed and unexpired (offline)
    Check { token: String },

    /// Show the signed-in user's profile
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    Show,

    Set {
        #[arg(long)]
        search: Option<String>,

        /// Status code, comma-separated list, or "all"
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        sort_by: Option<SortField>,

        #[arg(long)]
        order: Option<SortOrder>,

        #[arg(long)]
        view: Option<ViewMode>,

        /// Building ids; replaces the saved list
        #[arg(long, value_delimiter = ',')]
        buildings: Option<Vec<i64>>,

        /// Planned date range, `YYYY-MM-DD..YYYY-MM-DD` (either side may be empty)
        #[arg(long)]
        planned: Option<String>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Reset to defaults
    Clear,
}
