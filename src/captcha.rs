//! Honeypot check for public forms
//!
//! A form carries a field hidden from people; bots fill it in. Submissions
//! that also arrive faster than a person could type are rejected as well.

use std::time::Duration;

use crate::config::CaptchaConfig;

/// Why a submission was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoneypotVerdict {
    Human,
    /// The hidden field was filled in
    FieldFilled,
    /// The form came back too quickly
    TooFast,
}

impl HoneypotVerdict {
    #[must_use]
    pub const fn is_human(self) -> bool {
        matches!(self, Self::Human)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoneypotCheck {
    min_fill_time: Duration,
}

impl Default for HoneypotCheck {
    fn default() -> Self {
        Self::from_config(&CaptchaConfig::default())
    }
}

impl HoneypotCheck {
    #[must_use]
    pub const fn new(min_fill_time: Duration) -> Self {
        Self { min_fill_time }
    }

    #[must_use]
    pub const fn from_config(config: &CaptchaConfig) -> Self {
        Self::new(Duration::from_millis(config.min_fill_ms))
    }

    /// Judge a submission from its hidden field and the time since the form was shown
    #[must_use]
    pub fn verify(&self, honeypot_value: &str, elapsed: Duration) -> HoneypotVerdict {
        if !honeypot_value.trim().is_empty() {
            tracing::debug!("Honeypot field was filled in");
            return HoneypotVerdict::FieldFilled;
        }
        if elapsed < self.min_fill_time {
            tracing::debug!("Form submitted after {:?}", elapsed);
            return HoneypotVerdict::TooFast;
        }
        HoneypotVerdict::Human
    }
}
