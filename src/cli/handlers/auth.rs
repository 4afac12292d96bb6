use chrono::Utc;

use super::HandlerContext;
use crate::auth::{TokenPair, TokenStatus, decode_claims, is_token_valid};
use crate::cli::{AuthCommands, OutputFormatter};
use crate::error::{Result, TicketDeskError};
use crate::storage::TokenStorage;

pub async fn handle_auth_command(
    command: AuthCommands,
    ctx: &HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    match command {
        AuthCommands::Login {
            access_token,
            refresh_token,
        } => {
            ctx.auth.login(&TokenPair {
                access_token: access_token.trim().to_string(),
                refresh_token: refresh_token.map(|t| t.trim().to_string()),
            })?;
            if output.is_json() {
                output.print_json(&serde_json::json!({ "status": "success" }))
            } else {
                output.success("Session stored");
                Ok(())
            }
        },
        AuthCommands::Logout => {
            ctx.auth.logout()?;
            if output.is_json() {
                output.print_json(&serde_json::json!({ "status": "success" }))
            } else {
                output.success("Logged out");
                Ok(())
            }
        },
        AuthCommands::Status => handle_status(ctx, output).await,
        AuthCommands::Check { token } => handle_check(&token, output),
        AuthCommands::Whoami => {
            ctx.authorize().await?;
            let profile = ctx.client.profile().await?;
            if output.is_json() {
                output.print_json(&profile)
            } else {
                output.info(&format!("{} <{}>", profile.name, profile.email));
                output.info(&format!("Role: {}", profile.role));
                Ok(())
            }
        },
    }
}

async fn handle_status(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    let before = ctx.auth.status()?;
    let outcome = match before {
        TokenStatus::LoggedOut => None,
        TokenStatus::Valid | TokenStatus::NeedsRefresh => {
            Some(ctx.auth.access_token(&ctx.client).await)
        },
    };

    let expires_at = ctx
        .store
        .access_token()?
        .and_then(|token| decode_claims(&token))
        .and_then(|claims| claims.expires_at());
    let refreshed = before == TokenStatus::NeedsRefresh && matches!(outcome, Some(Ok(_)));
    let session_valid = match outcome {
        Some(Ok(_)) => ctx.client.validate_session().await.unwrap_or(false),
        _ => false,
    };

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "logged_in": session_valid,
            "refreshed": refreshed,
            "expires_at": expires_at,
        }));
    }

    if !session_valid {
        output.warning("Not logged in");
        return Ok(());
    }
    if refreshed {
        output.success("Access token refreshed");
    }
    output.success("Logged in");
    if let Some(expires_at) = expires_at {
        let minutes = (expires_at - Utc::now()).num_minutes();
        output.info(&format!(
            "Access token expires at {} ({minutes} min)",
            expires_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    Ok(())
}

fn handle_check(token: &str, output: &OutputFormatter) -> Result<()> {
    let valid = is_token_valid(token.trim());
    let expires_at = decode_claims(token.trim()).and_then(|claims| claims.expires_at());

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "valid": valid,
            "expires_at": expires_at,
        }))?;
    } else if valid {
        output.success("Token is valid");
        if let Some(expires_at) = expires_at {
            output.info(&format!("Expires at {}", expires_at.format("%Y-%m-%d %H:%M UTC")));
        }
    } else {
        output.warning("Token is malformed or expired");
    }

    if valid {
        Ok(())
    } else {
        Err(TicketDeskError::NotAuthenticated)
    }
}
