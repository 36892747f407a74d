//! Mutation state types.

use backoffice_core::{ActionOutcome, FormPayload};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Navigation target after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Redirect(pub String);

impl Redirect {
    /// Create a redirect target.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    /// The target as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one mutation invocation.
///
/// ```text
/// Idle ──Submit──▶ InFlight ──Responded(Ok)──▶ (side effect) ──Finished(Ok)──▶ Succeeded
///                      │                                     └─Finished(Err)─▶ Failed
///                      └──────Responded(Err)─────────────────────────────────▶ Failed
/// ```
///
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MutationState {
    /// Nothing submitted yet.
    #[default]
    Idle,

    /// The remote call (or its success side effect) is running.
    InFlight {
        /// The submitted form data, kept for repopulation on failure.
        payload: FormPayload,
    },

    /// Done; navigate away.
    Succeeded {
        /// Navigation target.
        redirect: Redirect,
    },

    /// Done; show the outcome inline.
    Failed {
        /// Normalized failure, carrying the submitted payload.
        outcome: ActionOutcome,
    },
}

impl MutationState {
    /// Whether the state is `Succeeded` or `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// Whether a call is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight { .. } => "in_flight",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// What the caller of a mutation gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MutationResult {
    /// Control leaves the current view.
    Redirect {
        /// Navigation target.
        to: Redirect,
    },

    /// The form is shown again with this outcome.
    Rejected {
        /// Normalized failure.
        outcome: ActionOutcome,
    },
}

impl MutationResult {
    /// The redirect target, if the mutation succeeded.
    #[must_use]
    pub const fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect { to } => Some(to),
            Self::Rejected { .. } => None,
        }
    }

    /// The outcome, if the mutation failed.
    #[must_use]
    pub const fn outcome(&self) -> Option<&ActionOutcome> {
        match self {
            Self::Redirect { .. } => None,
            Self::Rejected { outcome } => Some(outcome),
        }
    }
}
