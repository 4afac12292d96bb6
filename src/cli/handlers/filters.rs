use super::HandlerContext;
use crate::cli::{FilterCommands, OutputFormatter};
use crate::core::{ALL_STATUSES, Status, TicketsFilters};
use crate::error::{Result, TicketDeskError};

pub fn handle_filter_command(
    command: FilterCommands,
    ctx: &HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let filters = &ctx.state.filters;
    match command {
        FilterCommands::Show => {},
        FilterCommands::Set {
            search,
            status,
            sort_by,
            order,
            view,
            buildings,
            planned,
            page_size,
        } => {
            let status = status.map(|s| normalize_status(&s)).transpose()?;
            let mut updated = filters.get();
            if let Some(search) = search {
                updated.search = search.trim().to_string();
            }
            if let Some(status) = status {
                updated.status = status;
            }
            if let Some(sort_by) = sort_by {
                updated.sort_by = sort_by;
            }
            if let Some(order) = order {
                updated.sort_order = order;
            }
            if let Some(view) = view {
                updated.view_mode = view;
            }
            if let Some(buildings) = buildings {
                updated.buildings = buildings;
            }
            if let Some(planned) = planned {
                updated.set_planned_range(&planned)?;
            }
            if let Some(page_size) = page_size {
                if page_size == 0 {
                    return Err(TicketDeskError::InvalidInput(
                        "Page size must be at least 1".to_string(),
                    ));
                }
                updated.page_size = page_size;
            }
            filters.set(updated)?;
            output.success("Filters saved");
        },
        FilterCommands::Clear => {
            filters.reset()?;
            output.success("Filters reset to defaults");
        },
    }

    print_filters(&filters.get(), output)
}

/// Validate a comma-separated status list, or `all`
fn normalize_status(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_STATUSES) {
        return Ok(ALL_STATUSES.to_string());
    }
    let codes = value
        .split(',')
        .map(|code| code.parse::<Status>().map(Status::as_str))
        .collect::<Result<Vec<_>>>()?;
    Ok(codes.join(","))
}

fn print_filters(filters: &TicketsFilters, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(filters);
    }

    let or_any = |value: &str| {
        if value.is_empty() {
            "(any)".to_string()
        } else {
            value.to_string()
        }
    };
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    output.info(&format!("Search:     {}", or_any(&filters.search)));
    output.info(&format!("Status:     {}", filters.status));
    output.info(&format!(
        "Sort:       {} {}",
        filters.sort_by.api_name(),
        filters.sort_order.as_str()
    ));
    output.info(&format!("View:       {:?}", filters.view_mode));
    let buildings: Vec<String> = filters.buildings.iter().map(ToString::to_string).collect();
    output.info(&format!("Buildings:  {}", or_any(&buildings.join(","))));
    output.info(&format!(
        "Planned:    {}..{}",
        date(filters.planned_from),
        date(filters.planned_to)
    ));
    output.info(&format!("Page size:  {}", filters.page_size));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normalization() {
        assert_eq!(normalize_status("ALL").unwrap(), ALL_STATUSES);
        assert_eq!(
            normalize_status("open, in-progress").unwrap(),
            "open,in_progress"
        );
        assert!(normalize_status("open,bogus").is_err());
    }
}
