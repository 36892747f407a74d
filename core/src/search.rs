//! Validation of the address parameters every list view supports.
//!
//! Each field has its own pure predicate; [`SearchSchema::validate`] runs all of
//! them and reports every offending key at once. Nothing is coerced: a
//! malformed link is rejected, never silently "fixed".

use crate::params::{AddressParameters, ParamValue};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// `page` key.
pub const PAGE: &str = "page";
/// `per_page` key.
pub const PER_PAGE: &str = "per_page";
/// `order` key.
pub const ORDER: &str = "order";
/// `created_at` key.
pub const CREATED_AT: &str = "created_at";
/// `updated_at` key.
pub const UPDATED_AT: &str = "updated_at";

/// Keys validated by [`SearchSchema`]. Any other key is a view-specific filter.
pub const SCHEMA_KEYS: [&str; 5] = [PAGE, PER_PAGE, ORDER, CREATED_AT, UPDATED_AT];

/// Maximum number of bounds in a date-range filter.
pub const MAX_DATE_BOUNDS: usize = 2;

/// Why a key was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueReason {
    /// More date bounds than allowed.
    TooManyDates {
        /// Allowed maximum.
        max: usize,
        /// Number supplied.
        found: usize,
    },
    /// A date bound is not a canonical ISO-8601 instant.
    InvalidDate {
        /// Position in the sequence.
        index: usize,
        /// Offending value.
        value: String,
    },
    /// Not an integer ≥ 1.
    NotPositiveInteger {
        /// Offending value.
        value: String,
    },
    /// A repeated key where a single value is required.
    ExpectedSingleValue,
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyDates { max, found } => {
                write!(f, "at most {max} dates allowed, found {found}")
            }
            Self::InvalidDate { index, value } => {
                write!(f, "value {index} ({value:?}) is not a canonical ISO-8601 instant")
            }
            Self::NotPositiveInteger { value } => {
                write!(f, "{value:?} is not a positive integer")
            }
            Self::ExpectedSingleValue => write!(f, "expected a single value"),
        }
    }
}

/// One rejected key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Parameter name.
    pub field: String,
    /// Why it was rejected.
    pub reason: IssueReason,
}

impl FieldIssue {
    fn new(field: &str, reason: IssueReason) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }
}

/// Address parameters failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search parameters: {}", summarize(.issues))]
pub struct SearchValidationError {
    /// Every offending key, in key order.
    pub issues: Vec<FieldIssue>,
}

impl SearchValidationError {
    /// Issues reported for one key.
    pub fn issues_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a IssueReason> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.field == field)
            .map(|issue| &issue.reason)
    }

    /// Offending keys.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.issues.iter().map(|issue| issue.field.as_str()).collect();
        fields.dedup();
        fields
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Date-range filter: up to two instants, read positionally as `from`, `to`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRangeFilter {
    bounds: Vec<DateTime<Utc>>,
}

impl DateRangeFilter {
    /// Lower bound.
    #[must_use]
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.bounds.first().copied()
    }

    /// Upper bound (open-ended when absent).
    #[must_use]
    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.bounds.get(1).copied()
    }

    /// All bounds.
    #[must_use]
    pub fn bounds(&self) -> &[DateTime<Utc>] {
        &self.bounds
    }

    /// Canonical string form of each bound.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.bounds.iter().map(|bound| canonical_instant(*bound)).collect()
    }
}

/// Typed result of a successful validation. `None` means "use the default".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// `created_at` range.
    pub created_at: Option<DateRangeFilter>,
    /// `updated_at` range.
    pub updated_at: Option<DateRangeFilter>,
    /// Opaque sort token.
    pub order: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Validation rules shared by every list view.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchSchema;

impl SearchSchema {
    /// Validate a snapshot of address parameters.
    ///
    /// Keys outside [`SCHEMA_KEYS`] are ignored here; they belong to the view.
    ///
    /// # Errors
    ///
    /// Returns [`SearchValidationError`] listing every offending key.
    pub fn validate(params: &AddressParameters) -> Result<SearchParams, SearchValidationError> {
        let mut issues = Vec::new();

        let created_at = collect(CREATED_AT, params.get(CREATED_AT).map(validate_date_range), &mut issues);
        let updated_at = collect(UPDATED_AT, params.get(UPDATED_AT).map(validate_date_range), &mut issues);
        let order = collect(ORDER, params.get(ORDER).map(validate_order), &mut issues);
        let page = collect(PAGE, params.get(PAGE).map(validate_positive_integer), &mut issues);
        let per_page = collect(PER_PAGE, params.get(PER_PAGE).map(validate_positive_integer), &mut issues);

        if issues.is_empty() {
            Ok(SearchParams {
                created_at,
                updated_at,
                order,
                page,
                per_page,
            })
        } else {
            issues.sort_by(|a, b| a.field.cmp(&b.field));
            Err(SearchValidationError { issues })
        }
    }
}

fn collect<T>(
    field: &str,
    result: Option<Result<T, Vec<IssueReason>>>,
    issues: &mut Vec<FieldIssue>,
) -> Option<T> {
    match result? {
        Ok(value) => Some(value),
        Err(reasons) => {
            issues.extend(reasons.into_iter().map(|reason| FieldIssue::new(field, reason)));
            None
        }
    }
}

/// Serialize an instant the way the address carries it:
/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn canonical_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse `value` as an instant, accepting it only if re-serializing yields the
/// exact same string.
#[must_use]
pub fn parse_canonical_instant(value: &str) -> Option<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(value).ok()?.with_timezone(&Utc);
    (canonical_instant(instant) == value).then_some(instant)
}

fn validate_date_range(value: &ParamValue) -> Result<DateRangeFilter, Vec<IssueReason>> {
    let values = value.as_slice();
    let mut reasons = Vec::new();

    if values.len() > MAX_DATE_BOUNDS {
        reasons.push(IssueReason::TooManyDates {
            max: MAX_DATE_BOUNDS,
            found: values.len(),
        });
    }

    let mut bounds = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        match parse_canonical_instant(raw) {
            Some(instant) => bounds.push(instant),
            None => reasons.push(IssueReason::InvalidDate {
                index,
                value: raw.clone(),
            }),
        }
    }

    if reasons.is_empty() {
        Ok(DateRangeFilter { bounds })
    } else {
        Err(reasons)
    }
}

fn validate_order(value: &ParamValue) -> Result<String, Vec<IssueReason>> {
    value
        .as_single()
        .map(ToString::to_string)
        .ok_or_else(|| vec![IssueReason::ExpectedSingleValue])
}

fn validate_positive_integer(value: &ParamValue) -> Result<u32, Vec<IssueReason>> {
    let raw = value.as_single().ok_or_else(|| vec![IssueReason::ExpectedSingleValue])?;
    parse_positive_integer(raw).ok_or_else(|| {
        vec![IssueReason::NotPositiveInteger {
            value: raw.to_string(),
        }]
    })
}

/// Strict positive-integer parse: ASCII digits only, no sign or whitespace,
/// value ≥ 1.
#[must_use]
pub fn parse_positive_integer(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().filter(|value| *value >= 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, ParamValue)]) -> AddressParameters {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn many(values: &[&str]) -> ParamValue {
        ParamValue::Many(values.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_empty_address_is_all_defaults() {
        let search = SearchSchema::validate(&AddressParameters::new()).unwrap();
        assert_eq!(search, SearchParams::default());
    }

    #[test]
    fn test_accepts_single_canonical_date() {
        let search =
            SearchSchema::validate(&params(&[(CREATED_AT, many(&["2024-01-01T00:00:00.000Z"]))])).unwrap();
        let range = search.created_at.unwrap();
        assert_eq!(range.bounds().len(), 1);
        assert_eq!(range.to(), None);
        assert_eq!(range.to_strings(), vec!["2024-01-01T00:00:00.000Z".to_string()]);
    }

    #[test]
    fn test_accepts_single_value_form_of_date() {
        let search =
            SearchSchema::validate(&params(&[(UPDATED_AT, "2024-03-05T10:20:30.400Z".into())])).unwrap();
        assert!(search.updated_at.unwrap().from().is_some());
    }

    #[test]
    fn test_rejects_invalid_date_in_range() {
        let err = SearchSchema::validate(&params(&[(
            CREATED_AT,
            many(&["2024-01-01T00:00:00.000Z", "not-a-date"]),
        )]))
        .unwrap_err();

        assert_eq!(err.fields(), vec![CREATED_AT]);
        assert_eq!(
            err.issues_for(CREATED_AT).collect::<Vec<_>>(),
            vec![&IssueReason::InvalidDate {
                index: 1,
                value: "not-a-date".to_string()
            }]
        );
    }

    #[test]
    fn test_rejects_three_dates() {
        let err = SearchSchema::validate(&params(&[(
            CREATED_AT,
            many(&[
                "2024-01-01T00:00:00.000Z",
                "2024-01-02T00:00:00.000Z",
                "2024-01-03T00:00:00.000Z",
            ]),
        )]))
        .unwrap_err();

        assert!(err
            .issues_for(CREATED_AT)
            .any(|reason| *reason == IssueReason::TooManyDates { max: 2, found: 3 }));
    }

    #[test]
    fn test_rejects_non_canonical_dates() {
        for raw in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T01:00:00.000+01:00",
            "2024-01-01",
            "2024-02-30T00:00:00.000Z",
            "2024-01-01t00:00:00.000z",
        ] {
            assert!(parse_canonical_instant(raw).is_none(), "{raw} should be rejected");
        }
        assert!(parse_canonical_instant("2024-02-29T23:59:59.999Z").is_some());
    }

    #[test]
    fn test_page_rules() {
        assert_eq!(parse_positive_integer("1"), Some(1));
        assert_eq!(parse_positive_integer("42"), Some(42));
        assert_eq!(parse_positive_integer("07"), Some(7));
        for raw in ["0", "00", "-1", "1.5", "abc", "", "+3", " 2", "1e3", "99999999999"] {
            assert_eq!(parse_positive_integer(raw), None, "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_reports_every_offending_key() {
        let err = SearchSchema::validate(&params(&[
            (PAGE, "0".into()),
            (PER_PAGE, many(&["10", "20"])),
            (ORDER, "name".into()),
        ]))
        .unwrap_err();

        assert_eq!(err.fields(), vec![PAGE, PER_PAGE]);
        assert!(err.to_string().contains("page: \"0\" is not a positive integer"));
        assert!(err.to_string().contains("per_page: expected a single value"));
    }

    #[test]
    fn test_order_is_opaque() {
        let search = SearchSchema::validate(&params(&[(ORDER, "-created_at,name".into())])).unwrap();
        assert_eq!(search.order.as_deref(), Some("-created_at,name"));
    }

    #[test]
    fn test_view_filters_are_ignored() {
        let search = SearchSchema::validate(&params(&[("status", "pending".into()), (PAGE, "3".into())])).unwrap();
        assert_eq!(search.page, Some(3));
    }
}
