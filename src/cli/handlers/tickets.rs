use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, TimeZone, Utc};

use super::HandlerContext;
use crate::api::AttachmentUpload;
use crate::cli::{OutputFormatter, TicketCommands};
use crate::core::{TicketDraftBuilder, TicketId, TicketMessage, TicketPatch};
use crate::error::{Result, TicketDeskError};
use crate::messages::subscribe_messages;

pub async fn handle_ticket_command(
    command: TicketCommands,
    ctx: &HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    if !matches!(command, TicketCommands::Stats) {
        ctx.authorize().await?;
    }

    match command {
        TicketCommands::List {
            page,
            search,
            status,
        } => handle_list(ctx, page, search, status, output).await,
        TicketCommands::Show { id } => {
            let ticket = ctx.client.fetch_ticket(id).await?;
            if output.is_json() {
                output.print_json(&ticket)?;
            } else {
                output.ticket_details(&ticket);
            }
            Ok(())
        },
        TicketCommands::Create {
            title,
            description,
            priority,
            planned,
            building,
            attachments,
        } => {
            let mut builder = TicketDraftBuilder::new(title)
                .description(description)
                .priority(priority);
            if let Some(planned) = planned {
                builder = builder.planned_at(parse_planned(&planned)?);
            }
            if let Some(building) = building {
                builder = builder.building(building);
            }

            let mut uploads = Vec::with_capacity(attachments.len());
            for path in &attachments {
                uploads.push(AttachmentUpload::from_path(path).await?);
            }

            let ticket = ctx.client.create_ticket(&builder.build(), uploads).await?;
            if output.is_json() {
                output.print_json(&ticket)?;
            } else {
                output.success(&format!("Created ticket #{}", ticket.id));
                output.ticket_line(&ticket);
            }
            Ok(())
        },
        TicketCommands::Update {
            id,
            title,
            status,
            priority,
        } => {
            let patch = TicketPatch {
                title,
                status,
                priority,
                ..TicketPatch::default()
            };
            if patch == TicketPatch::default() {
                return Err(TicketDeskError::InvalidInput(
                    "Nothing to update; pass --title, --status or --priority".to_string(),
                ));
            }
            let ticket = ctx.client.update_ticket(id, &patch).await?;
            if output.is_json() {
                output.print_json(&ticket)?;
            } else {
                output.success(&format!("Updated ticket #{id}"));
                output.ticket_line(&ticket);
            }
            Ok(())
        },
        TicketCommands::Delete { id } => {
            ctx.client.delete_ticket(id).await?;
            report(output, &format!("Deleted ticket #{id}"), id)
        },
        TicketCommands::Assign { id, user_id } => {
            ctx.client.assign_ticket(id, user_id).await?;
            report(output, &format!("Assigned ticket #{id} to user {user_id}"), id)
        },
        TicketCommands::Unassign { id } => {
            ctx.client.unassign_ticket(id).await?;
            report(output, &format!("Unassigned ticket #{id}"), id)
        },
        TicketCommands::Messages { id, follow } => handle_messages(ctx, id, follow, output).await,
        TicketCommands::Send { id, text } => {
            let message = ctx.client.send_message(id, &text).await?;
            if output.is_json() {
                output.print_json(&message)?;
            } else {
                output.success(&format!("Sent message to ticket #{id}"));
            }
            Ok(())
        },
        TicketCommands::Stats => {
            let stats = ctx.client.public_statistics(ctx.store.as_ref()).await?;
            if output.is_json() {
                output.print_json(&stats)?;
            } else {
                output.info(&format!("Total:        {}", stats.total));
                output.info(&format!("Open:         {}", stats.open));
                output.info(&format!("In progress:  {}", stats.in_progress));
                output.info(&format!("Closed:       {}", stats.closed));
            }
            Ok(())
        },
    }
}

async fn handle_list(
    ctx: &HandlerContext,
    page: u32,
    search: Option<String>,
    status: Option<String>,
    output: &OutputFormatter,
) -> Result<()> {
    let mut filters = ctx.state.filters.get();
    if let Some(search) = search {
        filters.search = search;
    }
    if let Some(status) = status {
        filters.status = status;
    }

    let result = ctx.client.fetch_tickets(&filters, page).await?;
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "page": page.max(1),
            "total_pages": result.total_pages,
            "items": result.items,
        }))?;
        return Ok(());
    }

    if result.items.is_empty() {
        output.info("No tickets found");
        return Ok(());
    }
    for ticket in &result.items {
        output.ticket_line(ticket);
    }
    output.info("");
    output.info(&format!("Page {} of {}", page.max(1), result.total_pages));
    Ok(())
}

async fn handle_messages(
    ctx: &HandlerContext,
    id: TicketId,
    follow: bool,
    output: &OutputFormatter,
) -> Result<()> {
    let messages = ctx.client.fetch_messages(id).await?;
    if !follow {
        if output.is_json() {
            output.print_json(&messages)?;
        } else {
            print_messages(output, &messages, None);
        }
        return Ok(());
    }

    print_messages(output, &messages, None);
    let mut last_seen = messages.iter().map(|m| m.id).max();
    let printer = output.clone();
    let interval = Duration::from_millis(ctx.config.messages.poll_interval_ms.max(500));

    let subscription = subscribe_messages(
        Arc::new(ctx.client.clone()),
        id,
        interval,
        move |messages| {
            print_messages(&printer, &messages, last_seen);
            if let Some(max) = messages.iter().map(|m| m.id).max() {
                last_seen = Some(last_seen.map_or(max, |seen| seen.max(max)));
            }
        },
    );

    output.info("Following messages, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    subscription.unsubscribe();
    Ok(())
}

fn print_messages(output: &OutputFormatter, messages: &[TicketMessage], after: Option<i64>) {
    for message in messages.iter().filter(|m| after.is_none_or(|seen| m.id > seen)) {
        if output.is_json() {
            if let Ok(line) = serde_json::to_string(message) {
                println!("{line}");
            }
        } else {
            output.info(&format!(
                "[{}] {}: {}",
                message.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                message.author.name,
                message.text
            ));
        }
    }
}

fn report(output: &OutputFormatter, message: &str, id: TicketId) -> Result<()> {
    if output.is_json() {
        output.print_json(&serde_json::json!({ "status": "success", "ticket": id }))
    } else {
        output.success(message);
        Ok(())
    }
}

/// 09:00 local time on a `YYYY-MM-DD` day, as UTC
fn parse_planned(value: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TicketDeskError::InvalidInput(format!("Invalid planned date: {value}")))?;
    date.and_hms_opt(9, 0, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| TicketDeskError::InvalidInput(format!("Invalid planned date: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_planned_date() {
        assert!(parse_planned("2025-03-14").is_ok());
        assert!(parse_planned("14.03.2025").is_err());
    }
}
