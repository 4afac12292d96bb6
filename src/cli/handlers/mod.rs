//! Command handlers
//!
//! Handlers print through the [`OutputFormatter`] and return errors to
//! `main`, which renders them with suggestions.

mod admin;
mod auth;
mod context;
mod filters;
mod tickets;

pub use admin::handle_admin_command;
pub use auth::handle_auth_command;
pub use context::HandlerContext;
pub use filters::handle_filter_command;
pub use tickets::handle_ticket_command;

use crate::cli::OutputFormatter;
use crate::config::Config;
use crate::error::{Result, TicketDeskError};

/// Print the effective configuration
pub fn handle_config_show(config: &Config, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(config);
    }

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| TicketDeskError::custom(format!("Failed to render configuration: {e}")))?;
    if let Some(path) = Config::default_path() {
        output.info(&format!("# default file: {}", path.display()));
    }
    output.info(&format!("# storage: {}", config.storage_path().display()));
    output.info(yaml.trim_end());
    Ok(())
}
