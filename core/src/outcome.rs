//! Normalized results of remote calls.
//!
//! [`OutcomeBuilder`] turns either a successful response or a caught
//! [`TransportFailure`] into an immutable [`ActionOutcome`]. Rendering code only
//! ever sees outcomes, never raw transport errors.
//!
//! # Example
//!
//! ```
//! use backoffice_core::outcome::OutcomeBuilder;
//! use backoffice_core::status::CodeType;
//! use backoffice_core::transport::{FailureBody, FormPayload, TransportFailure};
//!
//! let failure = TransportFailure::http(422, FailureBody::default())
//!     .with_field_error("email", "taken");
//! let mut payload = FormPayload::new();
//! payload.insert("email".to_string(), "a@b.com".to_string());
//!
//! let outcome = OutcomeBuilder::from_failure(&failure, Some(payload));
//! assert_eq!(outcome.code_type(), CodeType::Client);
//! assert!(outcome.is_client_error());
//! assert_eq!(outcome.field_errors("email"), ["taken".to_string()]);
//! ```

use crate::status::{CodeType, StatusFlags};
use crate::transport::{ApiResponse, FieldErrors, FormPayload, TransportFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when a failure carries none of its own.
pub const FALLBACK_MESSAGE: &str = "There was a problem with the server. Please try again.";

/// Discriminated result of one remote call attempt.
///
/// `errors` is `None` for successes and `Some` (possibly empty) for failures,
/// so "no field errors reported" and "not a failure" stay distinguishable.
///
/// Deserialization checks that `codeType` and the flags agree with `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawOutcome")]
pub struct ActionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    code_type: CodeType,
    #[serde(flatten)]
    flags: StatusFlags,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<FormPayload>,
}

impl ActionOutcome {
    fn new(
        code: Option<u16>,
        message: String,
        errors: Option<FieldErrors>,
        payload: Option<FormPayload>,
    ) -> Self {
        let code_type = CodeType::from_status(code);
        Self {
            code,
            code_type,
            flags: code_type.flags(),
            message,
            errors,
            payload,
        }
    }

    /// Status code, if the call produced one.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        self.code
    }

    /// Status family.
    #[must_use]
    pub const fn code_type(&self) -> CodeType {
        self.code_type
    }

    /// Family flags.
    #[must_use]
    pub const fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// `1xx`
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        self.flags.is_informational
    }

    /// `2xx`
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.flags.is_success
    }

    /// `3xx`
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.flags.is_redirection
    }

    /// `4xx`
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.flags.is_client_error
    }

    /// `5xx` and above
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.flags.is_server_error
    }

    /// Missing or out-of-range status.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.flags.is_unknown
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field-level errors (failures only).
    #[must_use]
    pub const fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    /// Errors for a single field, empty when there are none.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The submitted form data, for re-rendering the form.
    #[must_use]
    pub const fn payload(&self) -> Option<&FormPayload> {
        self.payload.as_ref()
    }
}

/// Serialized outcome whose classification contradicts its status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("outcome for status {code:?} must classify as {expected}, got {found}")]
pub struct InconsistentOutcome {
    code: Option<u16>,
    expected: CodeType,
    found: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutcome {
    #[serde(default)]
    code: Option<u16>,
    code_type: CodeType,
    #[serde(flatten)]
    flags: StatusFlags,
    message: String,
    #[serde(default)]
    errors: Option<FieldErrors>,
    #[serde(default)]
    payload: Option<FormPayload>,
}

impl TryFrom<RawOutcome> for ActionOutcome {
    type Error = InconsistentOutcome;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        let outcome = Self::new(raw.code, raw.message, raw.errors, raw.payload);
        if raw.code_type != outcome.code_type {
            return Err(InconsistentOutcome {
                code: raw.code,
                expected: outcome.code_type,
                found: raw.code_type.to_string(),
            });
        }
        if raw.flags != outcome.flags {
            return Err(InconsistentOutcome {
                code: raw.code,
                expected: outcome.code_type,
                found: format!("{} flags set", raw.flags.count_set()),
            });
        }
        Ok(outcome)
    }
}

/// Builds [`ActionOutcome`]s. Pure; the HTTP call happens elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeBuilder;

impl OutcomeBuilder {
    /// Outcome for a response the transport considered successful.
    ///
    /// The message is the body's `message` field (empty when absent).
    #[must_use]
    pub fn from_success(response: &ApiResponse) -> ActionOutcome {
        let message = response.message().unwrap_or_default().to_string();
        ActionOutcome::new(Some(response.status), message, None, None)
    }

    /// Outcome for a caught failure.
    ///
    /// A missing status classifies as unknown, a missing message falls back to
    /// [`FALLBACK_MESSAGE`], and missing field errors become an empty mapping.
    #[must_use]
    pub fn from_failure(failure: &TransportFailure, payload: Option<FormPayload>) -> ActionOutcome {
        let message = failure
            .data
            .message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        let errors = failure.data.errors.clone().unwrap_or_default();

        ActionOutcome::new(failure.status, message, Some(errors), payload)
    }

    /// Outcome for either side of a transport result.
    #[must_use]
    pub fn from_result(
        result: &Result<ApiResponse, TransportFailure>,
        payload: Option<FormPayload>,
    ) -> ActionOutcome {
        match result {
            Ok(response) => Self::from_success(response),
            Err(failure) => Self::from_failure(failure, payload),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::transport::FailureBody;
    use serde_json::json;

    fn payload(pairs: &[(&str, &str)]) -> FormPayload {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_success_takes_body_message() {
        let response = ApiResponse::new(201, json!({"message": "Product created"}));
        let outcome = OutcomeBuilder::from_success(&response);

        assert_eq!(outcome.code(), Some(201));
        assert_eq!(outcome.code_type(), CodeType::Success);
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Product created");
        assert!(outcome.errors().is_none());
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_from_success_without_message() {
        let outcome = OutcomeBuilder::from_success(&ApiResponse::new(204, serde_json::Value::Null));
        assert_eq!(outcome.message(), "");
        assert!(outcome.is_success());
    }

    #[test]
    fn test_from_failure_with_field_errors() {
        let failure = TransportFailure::http(422, FailureBody::default()).with_field_error("email", "taken");
        let outcome = OutcomeBuilder::from_failure(&failure, Some(payload(&[("email", "a@b.com")])));

        assert_eq!(outcome.code_type(), CodeType::Client);
        assert!(outcome.is_client_error());
        assert_eq!(outcome.field_errors("email"), ["taken".to_string()]);
        assert_eq!(outcome.payload().unwrap()["email"], "a@b.com");
        assert_eq!(outcome.message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_from_failure_without_status_or_message() {
        let outcome = OutcomeBuilder::from_failure(&TransportFailure::network(), None);

        assert_eq!(outcome.code(), None);
        assert_eq!(outcome.code_type(), CodeType::Unknown);
        assert!(outcome.is_unknown());
        assert_eq!(outcome.message(), FALLBACK_MESSAGE);
        assert_eq!(outcome.errors(), Some(&FieldErrors::new()));
    }

    #[test]
    fn test_from_failure_keeps_server_message() {
        let failure = TransportFailure::http(503, FailureBody::default()).with_message("Maintenance window");
        let outcome = OutcomeBuilder::from_failure(&failure, None);

        assert!(outcome.is_server_error());
        assert_eq!(outcome.message(), "Maintenance window");
        assert!(outcome.field_errors("email").is_empty());
    }

    #[test]
    fn test_from_result_dispatches() {
        let ok: Result<ApiResponse, TransportFailure> = Ok(ApiResponse::new(200, json!({})));
        assert!(OutcomeBuilder::from_result(&ok, None).is_success());

        let err: Result<ApiResponse, TransportFailure> =
            Err(TransportFailure::http(404, FailureBody::default()));
        assert!(OutcomeBuilder::from_result(&err, None).is_client_error());
    }

    #[test]
    fn test_deserialize_accepts_own_output() {
        let failure = TransportFailure::http(404, FailureBody::default()).with_message("gone");
        let outcome = OutcomeBuilder::from_failure(&failure, None);

        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(serde_json::from_str::<ActionOutcome>(&json).unwrap(), outcome);
    }

    #[test]
    fn test_deserialize_rejects_contradicting_classification() {
        let flags = |success: bool, client: bool, server: bool| {
            json!({
                "code": 422,
                "codeType": "client",
                "isInformational": false,
                "isSuccess": success,
                "isRedirection": false,
                "isClientError": client,
                "isServerError": server,
                "isUnknown": false,
                "message": "",
            })
        };

        assert!(serde_json::from_value::<ActionOutcome>(flags(false, true, false)).is_ok());
        assert!(serde_json::from_value::<ActionOutcome>(flags(true, true, true)).is_err());

        let mut wrong_family = flags(false, true, false);
        wrong_family["codeType"] = json!("success");
        assert!(serde_json::from_value::<ActionOutcome>(wrong_family).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let failure = TransportFailure::http(422, FailureBody::default()).with_field_error("email", "taken");
        let outcome = OutcomeBuilder::from_failure(&failure, Some(payload(&[("email", "a@b.com")])));
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["code"], 422);
        assert_eq!(value["codeType"], "client");
        assert_eq!(value["isClientError"], true);
        assert_eq!(value["isSuccess"], false);
        assert_eq!(value["errors"]["email"][0], "taken");
        assert_eq!(value["payload"]["email"], "a@b.com");
    }
}
