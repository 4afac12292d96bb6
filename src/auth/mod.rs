//! Auth token handling
//!
//! Token validity is advisory: the client decodes the JWT payload to decide
//! whether to send or refresh a token, and leaves signature checks to the
//! server.

mod manager;
mod token;

pub use manager::{AuthManager, REFRESH_LEEWAY_SECS, TokenStatus};
pub use token::{Claims, TokenPair, decode_claims, is_token_valid, is_token_valid_at};

#[cfg(test)]
pub(crate) use token::make_token;
