//! Session and profile endpoints

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::auth::TokenPair;
use crate::error::{Result, TicketDeskError};

/// The signed-in user's own profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl Profile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    valid: bool,
}

impl ApiClient {
    pub async fn profile(&self) -> Result<Profile> {
        self.get("user/profile").await?.into_data(self.locale())
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        self.patch("user/profile", update)
            .await?
            .into_data(self.locale())
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        if new_password.chars().count() < 8 {
            return Err(TicketDeskError::InvalidInput(
                "New password must be at least 8 characters".to_string(),
            ));
        }
        if old_password == new_password {
            return Err(TicketDeskError::InvalidInput(
                "New password must differ from the old one".to_string(),
            ));
        }
        self.post::<_, serde_json::Value>(
            "user/password",
            &PasswordChange {
                old_password,
                new_password,
            },
        )
        .await?
        .into_result(self.locale())?;
        Ok(())
    }

    /// Ask the server whether the current session (cookie or bearer) is valid
    pub async fn validate_session(&self) -> Result<bool> {
        let response = self.get::<ValidateResponse>("auth/validate").await?;
        if response.status.is_client_error() {
            return Ok(false);
        }
        Ok(response
            .into_result(self.locale())?
            .is_none_or(|body| body.valid))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair> {
        self.post("auth/refresh", &RefreshRequest { refresh_token })
            .await?
            .into_data(self.locale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_detection() {
        let profile = Profile {
            id: 1,
            email: "a@example.com".into(),
            name: "Ann".into(),
            role: "Admin".into(),
        };
        assert!(profile.is_admin());
    }
}
