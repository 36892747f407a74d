//! Proptest strategies for console inputs.

use backoffice_core::search::SCHEMA_KEYS;
use backoffice_core::{AddressParameters, FormPayload, ParamValue};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

/// Any status code a server might send, including nonsense outside `100..=599`.
pub fn status_code() -> impl Strategy<Value = u16> {
    prop_oneof![
        4 => 100u16..=599,
        1 => any::<u16>(),
    ]
}

/// A status code in the given family, e.g. `4` for `4xx`.
pub fn status_in_family(family: u16) -> impl Strategy<Value = u16> {
    (family * 100)..=(family * 100 + 99)
}

/// Decimal page or page-size value as typed into an address, leading zeros allowed.
pub fn page_value() -> impl Strategy<Value = (u32, String)> {
    (1u32..10_000, 0usize..3).prop_map(|(n, zeros)| (n, format!("{}{n}", "0".repeat(zeros))))
}

/// Lowercase filter key that is not one of the search schema keys.
pub fn filter_key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,11}".prop_filter("schema keys are not filters", |key| {
        !SCHEMA_KEYS.contains(&key.as_str())
    })
}

/// Address made only of free-form filters, single or repeated.
pub fn filter_params() -> impl Strategy<Value = AddressParameters> {
    let value = prop_oneof![
        "[a-zA-Z0-9 ]{1,12}".prop_map(ParamValue::from),
        vec("[a-z0-9]{1,6}", 2..4).prop_map(ParamValue::from),
    ];
    btree_map(filter_key(), value, 0..5).prop_map(|filters| {
        let mut params = AddressParameters::new();
        for (key, value) in filters {
            params.insert(key, value);
        }
        params
    })
}

/// Submitted form fields.
pub fn form_payload() -> impl Strategy<Value = FormPayload> {
    btree_map("[a-z]{1,10}", "[ -~]{0,16}", 1..4)
}
