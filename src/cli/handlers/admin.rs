use std::sync::Arc;

use serde::Serialize;

use super::HandlerContext;
use crate::api::{AdminResource, Bot, Building, CrudHelper, Department, User, UserInvite};
use crate::cli::{
    AdminCommands, BotCommands, BuildingCommands, DepartmentCommands, OutputFormatter,
    UserCommands,
};
use crate::error::{Result, TicketDeskError};

pub async fn handle_admin_command(
    command: AdminCommands,
    ctx: &HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    ctx.authorize().await?;

    match command {
        AdminCommands::Buildings { command } => match command {
            BuildingCommands::List { page, search } => {
                list_items::<Building, _>(ctx, output, page, &search, |b| {
                    format!("{:>5}  {:<8} {}", b.id, b.code, b.name)
                })
                .await
            },
            BuildingCommands::Create { code, name } => {
                let created = ctx
                    .client
                    .create_building(&ctx.state.consts, &code, &name)
                    .await?;
                if output.is_json() {
                    output.print_json(&created)?;
                } else {
                    output.success(&format!("Created building {}", code.trim()));
                    output.info(&format!(
                        "{} buildings known",
                        ctx.state.consts.get().buildings.len()
                    ));
                }
                Ok(())
            },
            BuildingCommands::Delete { id } => {
                ctx.client.delete_building(&ctx.state.consts, id).await?;
                deleted(output, Building::LABEL, id)
            },
        },
        AdminCommands::Departments { command } => match command {
            DepartmentCommands::List { page, search } => {
                list_items::<Department, _>(ctx, output, page, &search, |d| {
                    format!("{:>5}  {}", d.id, d.name)
                })
                .await
            },
            DepartmentCommands::Create { name } => {
                if name.trim().is_empty() {
                    return Err(TicketDeskError::InvalidInput(
                        "Department name is required".to_string(),
                    ));
                }
                ctx.client
                    .create_department(&ctx.state.consts, &name)
                    .await?;
                if output.is_json() {
                    output.print_json(&serde_json::json!({ "status": "success", "name": name }))
                } else {
                    output.success(&format!("Created department {}", name.trim()));
                    Ok(())
                }
            },
            DepartmentCommands::Delete { id } => delete_item::<Department>(ctx, output, id).await,
        },
        AdminCommands::Users { command } => match command {
            UserCommands::List { page, search } => {
                list_items::<User, _>(ctx, output, page, &search, |u| {
                    format!("{:>5}  {:<30} {:<20} {}", u.id, u.email, u.name, u.role)
                })
                .await
            },
            UserCommands::Invite {
                email,
                role,
                department,
            } => {
                if !email.contains('@') {
                    return Err(TicketDeskError::InvalidInput(format!(
                        "Not an e-mail address: {email}"
                    )));
                }
                let invite = UserInvite {
                    email: email.trim().to_string(),
                    role,
                    department_id: department,
                };
                ctx.client.invite_user(&invite).await?;
                if output.is_json() {
                    output.print_json(&serde_json::json!({ "status": "success", "email": invite.email }))
                } else {
                    output.success(&format!("Invitation sent to {}", invite.email));
                    Ok(())
                }
            },
            UserCommands::Delete { id } => delete_item::<User>(ctx, output, id).await,
        },
        AdminCommands::Bots { command } => match command {
            BotCommands::List { page, search } => {
                list_items::<Bot, _>(ctx, output, page, &search, |b| {
                    let state = if b.active { "active" } else { "inactive" };
                    format!("{:>5}  {:<20} {:<10} {}", b.id, b.name, b.platform, state)
                })
                .await
            },
            BotCommands::Delete { id } => delete_item::<Bot>(ctx, output, id).await,
        },
    }
}

async fn list_items<T, F>(
    ctx: &HandlerContext,
    output: &OutputFormatter,
    page: u32,
    search: &str,
    line: F,
) -> Result<()>
where
    T: AdminResource + Serialize,
    F: Fn(&T) -> String,
{
    let mut helper = CrudHelper::<T>::new(ctx.client.clone(), Arc::new(output.clone()));
    helper.load_items(page, search).await;
    if helper.has_error {
        return Err(TicketDeskError::Api(format!("Could not load {} list", T::LABEL)));
    }

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "page": helper.page,
            "max_page": helper.max_page,
            "items": helper.items,
        }));
    }

    if helper.items.is_empty() {
        output.info(&format!("No {} entries found", T::LABEL));
        return Ok(());
    }
    for item in &helper.items {
        output.info(&line(item));
    }
    output.info("");
    output.info(&format!("Page {} of {}", helper.page, helper.max_page));
    Ok(())
}

async fn delete_item<T: AdminResource>(
    ctx: &HandlerContext,
    output: &OutputFormatter,
    id: i64,
) -> Result<()> {
    let mut helper = CrudHelper::<T>::new(ctx.client.clone(), Arc::new(output.clone()));
    helper.delete_item(id).await?;
    if output.is_json() {
        output.print_json(&serde_json::json!({ "status": "success", "id": id }))?;
    }
    Ok(())
}

fn deleted(output: &OutputFormatter, label: &str, id: i64) -> Result<()> {
    if output.is_json() {
        output.print_json(&serde_json::json!({ "status": "success", "id": id }))
    } else {
        output.success(&format!("Deleted {label} {id}"));
        Ok(())
    }
}
