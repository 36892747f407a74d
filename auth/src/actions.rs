//! Mutation actions.

use crate::state::Redirect;
use backoffice_core::{ApiResponse, FormPayload, TransportFailure};

/// Actions driving a [`MutationReducer`](crate::reducers::MutationReducer).
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAction {
    /// The user submitted the form.
    Submit {
        /// Field name to value.
        payload: FormPayload,
    },

    /// The remote call answered (or failed to).
    Responded {
        /// Response or typed failure.
        result: Result<ApiResponse, TransportFailure>,
    },

    /// The success side effect completed.
    Finished {
        /// Navigation target, or the failure that prevented it.
        result: Result<Redirect, TransportFailure>,
    },
}

impl MutationAction {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Responded { .. } => "responded",
            Self::Finished { .. } => "finished",
        }
    }
}
