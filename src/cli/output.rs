//! Terminal output for the command-line front end

use colored::Colorize;
use serde::Serialize;

use crate::core::{Priority, Status, Ticket};
use crate::error::{Result, TicketDeskError};
use crate::notify::{NotificationKind, Notifier};

/// How command results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Writes human-readable or machine-readable output
///
/// In JSON and YAML modes the informational lines are suppressed so that
/// stdout carries only the structured document.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    #[must_use]
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether a structured document is expected instead of text
    #[must_use]
    pub const fn is_json(&self) -> bool {
        !matches!(self.format, OutputFormat::Text)
    }

    pub fn success(&self, message: &str) {
        if !self.is_json() {
            println!("{} {}", "✓".green().bold(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.is_json() {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.is_json() {
            eprintln!("{} {}", "!".yellow().bold(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    /// Print a structured value in the selected machine format
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(value)
                    .map_err(|e| TicketDeskError::custom(format!("YAML output failed: {e}")))?;
                print!("{yaml}");
            },
            OutputFormat::Json | OutputFormat::Text => {
                println!("{}", serde_json::to_string_pretty(value)?);
            },
        }
        Ok(())
    }

    /// One summary line per ticket
    pub fn ticket_line(&self, ticket: &Ticket) {
        let planned = ticket
            .planned_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        self.info(&format!(
            "{:>6}  {:<12} {:<9} {:<10} {}",
            format!("#{}", ticket.id).bold(),
            colored_status(ticket.status),
            colored_priority(ticket.priority),
            planned,
            ticket.title
        ));
    }

    /// Full view of one ticket
    pub fn ticket_details(&self, ticket: &Ticket) {
        self.info(&format!("{} {}", format!("#{}", ticket.id).bold(), ticket.title.bold()));
        self.info(&format!("Status:    {}", colored_status(ticket.status)));
        self.info(&format!("Priority:  {}", colored_priority(ticket.priority)));
        self.info(&format!("Author:    {}", ticket.author.name));
        if let Some(assignee) = &ticket.assignee {
            self.info(&format!("Assignee:  {}", assignee.name));
        }
        if let Some(building) = &ticket.building {
            self.info(&format!("Building:  {} ({})", building.name, building.code));
        }
        if let Some(planned) = ticket.planned_at {
            self.info(&format!("Planned:   {}", planned.format("%Y-%m-%d %H:%M")));
        }
        self.info(&format!("Created:   {}", ticket.created_at.format("%Y-%m-%d %H:%M")));
        if !ticket.description.is_empty() {
            self.info("");
            self.info(&ticket.description);
        }
        if !ticket.attachments.is_empty() {
            self.info("");
            self.info("Attachments:");
            for attachment in &ticket.attachments {
                self.info(&format!("  {} {}", attachment.name, attachment.url.dimmed()));
            }
        }
    }
}

impl Notifier for OutputFormatter {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => self.success(message),
            NotificationKind::Info => self.info(message),
            NotificationKind::Warning => self.warning(message),
            NotificationKind::Error => self.error(message),
        }
    }
}

fn colored_status(status: Status) -> colored::ColoredString {
    let label = status.as_str();
    match status {
        Status::Open => label.cyan(),
        Status::InProgress => label.yellow(),
        Status::OnHold => label.magenta(),
        Status::Closed => label.green(),
        Status::Rejected => label.red(),
        Status::Unknown => label.dimmed(),
    }
}

fn colored_priority(priority: Priority) -> colored::ColoredString {
    let label = priority.as_str();
    match priority {
        Priority::Low => label.normal(),
        Priority::Medium => label.blue(),
        Priority::High => label.yellow(),
        Priority::Critical => label.red().bold(),
    }
}
