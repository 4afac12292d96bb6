//! ticket-desk - command-line client for the ticket-desk service desk
//!
//! Parses arguments, loads configuration and dispatches to the handlers in
//! `ticket_desk::cli::handlers`.

use clap::Parser;
use std::process;
use ticket_desk::cli::handlers::{
    HandlerContext, handle_admin_command, handle_auth_command, handle_config_show,
    handle_filter_command, handle_ticket_command,
};
use ticket_desk::cli::{Cli, Commands, OutputFormat, OutputFormatter};
use ticket_desk::config::Config;
use ticket_desk::error::{Result, TicketDeskError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else if cli.yaml {
        OutputFormat::Yaml
    } else {
        OutputFormat::Text
    };
    let formatter = OutputFormatter::new(format, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path.as_path()))?,
        None => Config::load_or_default()?,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(dispatch_command(cli.command, config, formatter))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch_command(
    command: Commands,
    config: Config,
    formatter: &OutputFormatter,
) -> Result<()> {
    if let Commands::Config = command {
        return handle_config_show(&config, formatter);
    }

    let ctx = HandlerContext::new(config)?;
    match command {
        Commands::Tickets { command } => handle_ticket_command(command, &ctx, formatter).await,
        Commands::Admin { command } => handle_admin_command(command, &ctx, formatter).await,
        Commands::Auth { command } => handle_auth_command(command, &ctx, formatter).await,
        Commands::Filters { command } => handle_filter_command(command, &ctx, formatter),
        Commands::Config => handle_config_show(&ctx.config, formatter),
    }
}

/// Print an error with its suggestions
fn handle_error(error: &TicketDeskError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() && !formatter.is_json() {
        formatter.info("\nSuggestions:");
        for suggestion in &suggestions {
            formatter.info(&format!("  • {suggestion}"));
        }
    }

    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "http_status": error.status().map(|s| s.as_u16()),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let _cli = Cli::parse_from(["ticket-desk", "tickets", "list"]);
        let _cli = Cli::parse_from(["ticket-desk", "admin", "buildings", "create", "A", "B"]);
        let _cli = Cli::parse_from(["ticket-desk", "--json", "auth", "check", "a.b.c"]);
        let _cli = Cli::parse_from([
            "ticket-desk",
            "filters",
            "set",
            "--buildings",
            "1,2,3",
            "--sort-by",
            "planned_at",
        ]);
    }
}
