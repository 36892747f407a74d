//! Status-family classification.
//!
//! Every numeric status produced by the remote API (or the lack of one) maps to
//! exactly one [`CodeType`]. The UI layer only ever branches on the family,
//! never on raw codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    /// `100..=199`
    Informational,
    /// `200..=299`
    Success,
    /// `300..=399`
    Redirection,
    /// `400..=499`
    Client,
    /// `500` and above
    Server,
    /// Zero, negative, or missing
    Unknown,
}

impl CodeType {
    /// All families, in classification order.
    pub const ALL: [Self; 6] = [
        Self::Informational,
        Self::Success,
        Self::Redirection,
        Self::Client,
        Self::Server,
        Self::Unknown,
    ];

    /// Classify a status code.
    ///
    /// Total over every integer: anything below 100 is [`CodeType::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use backoffice_core::status::CodeType;
    ///
    /// assert_eq!(CodeType::classify(404), CodeType::Client);
    /// assert_eq!(CodeType::classify(-1), CodeType::Unknown);
    /// ```
    #[must_use]
    pub const fn classify(code: i64) -> Self {
        match code {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::Client,
            500.. => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Classify an optional status; a missing status counts as `0`.
    #[must_use]
    pub const fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(code) => Self::classify(code as i64),
            None => Self::classify(0),
        }
    }

    /// Boolean view of this family. Exactly one flag is set.
    #[must_use]
    pub const fn flags(self) -> StatusFlags {
        StatusFlags {
            is_informational: matches!(self, Self::Informational),
            is_success: matches!(self, Self::Success),
            is_redirection: matches!(self, Self::Redirection),
            is_client_error: matches!(self, Self::Client),
            is_server_error: matches!(self, Self::Server),
            is_unknown: matches!(self, Self::Unknown),
        }
    }

    /// Lowercase label, as used in serialized outcomes and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Success => "success",
            Self::Redirection => "redirection",
            Self::Client => "client",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutually exclusive family flags derived from a [`CodeType`].
///
/// Serialized with camelCase names so UI consumers can branch on
/// `isClientError` and friends directly.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFlags {
    /// Family is informational.
    pub is_informational: bool,
    /// Family is success.
    pub is_success: bool,
    /// Family is redirection.
    pub is_redirection: bool,
    /// Family is client error.
    pub is_client_error: bool,
    /// Family is server error.
    pub is_server_error: bool,
    /// Family is unknown.
    pub is_unknown: bool,
}

impl StatusFlags {
    /// Number of flags that are set.
    #[must_use]
    pub const fn count_set(self) -> usize {
        self.is_informational as usize
            + self.is_success as usize
            + self.is_redirection as usize
            + self.is_client_error as usize
            + self.is_server_error as usize
            + self.is_unknown as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_range_boundaries() {
        assert_eq!(CodeType::classify(99), CodeType::Unknown);
        assert_eq!(CodeType::classify(100), CodeType::Informational);
        assert_eq!(CodeType::classify(199), CodeType::Informational);
        assert_eq!(CodeType::classify(200), CodeType::Success);
        assert_eq!(CodeType::classify(299), CodeType::Success);
        assert_eq!(CodeType::classify(300), CodeType::Redirection);
        assert_eq!(CodeType::classify(399), CodeType::Redirection);
        assert_eq!(CodeType::classify(400), CodeType::Client);
        assert_eq!(CodeType::classify(404), CodeType::Client);
        assert_eq!(CodeType::classify(499), CodeType::Client);
        assert_eq!(CodeType::classify(500), CodeType::Server);
        assert_eq!(CodeType::classify(503), CodeType::Server);
        assert_eq!(CodeType::classify(999), CodeType::Server);
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(CodeType::classify(0), CodeType::Unknown);
        assert_eq!(CodeType::classify(-1), CodeType::Unknown);
        assert_eq!(CodeType::from_status(None), CodeType::Unknown);
        assert_eq!(CodeType::from_status(Some(422)), CodeType::Client);
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_string(&CodeType::Client).unwrap_or_default();
        assert_eq!(json, "\"client\"");

        let flags = serde_json::to_value(CodeType::Server.flags()).unwrap_or_default();
        assert_eq!(flags["isServerError"], true);
        assert_eq!(flags["isClientError"], false);
    }

    #[test]
    fn test_display_matches_label() {
        for family in CodeType::ALL {
            assert_eq!(family.to_string(), family.as_str());
        }
    }

    proptest! {
        #[test]
        fn prop_exactly_one_flag(code in any::<i64>()) {
            let flags = CodeType::classify(code).flags();
            prop_assert_eq!(flags.count_set(), 1);
        }

        #[test]
        fn prop_http_codes_never_unknown(code in 100u16..1000) {
            prop_assert_ne!(CodeType::from_status(Some(code)), CodeType::Unknown);
        }
    }
}
