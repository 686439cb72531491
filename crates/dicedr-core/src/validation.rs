//! Validation outcome value object.

use std::fmt;

use serde::Serialize;

/// Whether a method can produce a meaningful outcome from its current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    ok: bool,
    message: String,
}

impl ValidationResult {
    /// A passing result with an empty message.
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            message: String::new(),
        }
    }

    /// A failing result carrying a localized reason.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }

    /// `true` when the method may run.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// The reason for failure; empty on success.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ok {
            f.write_str("Valid")
        } else {
            write!(f, "Invalid: {}", self.message)
        }
    }
}
