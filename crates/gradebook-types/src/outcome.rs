//! Binary result value returned by user-facing operations.
//!
//! An [`Outcome`] pairs a success flag with a message the caller is expected
//! to display unconditionally, so the message is mandatory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OutcomeError;

/// Immutable success/failure flag paired with an explanatory message.
///
/// Fields are private and there are no setters. Deserializing a payload
/// without a `detail` (or with `"detail": null`) fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    succeeded: bool,
    detail: String,
}

impl Outcome {
    /// Create an outcome from a flag and a message.
    pub fn new(succeeded: bool, detail: impl Into<String>) -> Self {
        Self {
            succeeded,
            detail: detail.into(),
        }
    }

    /// Create an outcome from a possibly absent message.
    ///
    /// An absent message is rejected; an empty string is accepted as-is.
    pub fn try_new(succeeded: bool, detail: Option<String>) -> Result<Self, OutcomeError> {
        let detail = detail.ok_or(OutcomeError::MissingDetail)?;
        Ok(Self { succeeded, detail })
    }

    /// Shorthand for `Outcome::new(true, detail)`.
    pub fn success(detail: impl Into<String>) -> Self {
        Self::new(true, detail)
    }

    /// Shorthand for `Outcome::new(false, detail)`.
    pub fn failure(detail: impl Into<String>) -> Self {
        Self::new(false, detail)
    }

    /// The flag passed at construction.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// The message passed at construction.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded {
            write!(f, "ok: {}", self.detail)
        } else {
            write!(f, "failed: {}", self.detail)
        }
    }
}
