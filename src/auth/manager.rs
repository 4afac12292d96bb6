use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use super::token::{TokenPair, is_token_valid_at};
use crate::api::ApiClient;
use crate::error::{Result, TicketDeskError};
use crate::storage::TokenStorage;

/// Tokens expiring sooner than this are refreshed ahead of time
pub const REFRESH_LEEWAY_SECS: i64 = 30;

/// What the stored tokens allow right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// The access token can be sent as is
    Valid,
    /// The access token is stale but the refresh token can renew it
    NeedsRefresh,
    /// Nothing usable is stored
    LoggedOut,
}

/// Keeps the stored access token fresh
pub struct AuthManager {
    tokens: Arc<dyn TokenStorage>,
    refresh_lock: Mutex<()>,
}

impl AuthManager {
    pub fn new(tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            tokens,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn status(&self) -> Result<TokenStatus> {
        let deadline = Utc::now() + Duration::seconds(REFRESH_LEEWAY_SECS);

        if let Some(access) = self.tokens.access_token()? {
            if is_token_valid_at(&access, deadline) {
                return Ok(TokenStatus::Valid);
            }
        }
        match self.tokens.refresh_token()? {
            Some(refresh) if is_token_valid_at(&refresh, Utc::now()) => {
                Ok(TokenStatus::NeedsRefresh)
            },
            _ => Ok(TokenStatus::LoggedOut),
        }
    }

    /// Store tokens obtained from a login flow
    pub fn login(&self, tokens: &TokenPair) -> Result<()> {
        if !is_token_valid_at(&tokens.access_token, Utc::now()) {
            return Err(TicketDeskError::InvalidInput(
                "Access token is malformed or already expired".to_string(),
            ));
        }
        self.tokens.store_tokens(tokens)?;
        tracing::info!("Stored new session tokens");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.tokens.clear_tokens()?;
        tracing::info!("Cleared session tokens");
        Ok(())
    }

    /// Return a usable access token, refreshing it through `client` when needed
    ///
    /// Clears the stored tokens and fails with `NotAuthenticated` when
    /// neither token is usable or the refresh is rejected.
    pub async fn access_token(&self, client: &ApiClient) -> Result<String> {
        // One refresh at a time; later callers see the renewed token
        let _guard = self.refresh_lock.lock().await;

        match self.status()? {
            TokenStatus::Valid => self
                .tokens
                .access_token()?
                .ok_or(TicketDeskError::NotAuthenticated),
            TokenStatus::NeedsRefresh => {
                let refresh = self
                    .tokens
                    .refresh_token()?
                    .ok_or(TicketDeskError::NotAuthenticated)?;
                tracing::debug!("Access token expired, refreshing");

                match client.refresh_tokens(&refresh).await {
                    Ok(mut pair) => {
                        if pair.refresh_token.is_none() {
                            pair.refresh_token = Some(refresh);
                        }
                        self.tokens.store_tokens(&pair)?;
                        Ok(pair.access_token)
                    },
                    Err(e) if e.status().is_some_and(|s| s.is_client_error()) => {
                        tracing::warn!("Token refresh rejected: {}", e);
                        self.tokens.clear_tokens()?;
                        Err(TicketDeskError::NotAuthenticated)
                    },
                    Err(e) => Err(e),
                }
            },
            TokenStatus::LoggedOut => {
                self.tokens.clear_tokens()?;
                Err(TicketDeskError::NotAuthenticated)
            },
        }
    }
}
