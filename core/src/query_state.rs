//! Typed pagination/sort/filter state projected from the address.
//!
//! [`QueryStateBinding`] keeps no state of its own. Every read validates the
//! current address through [`SearchSchema`]; every write is a read-merge-write
//! routed through [`Location::update`], with defaults stripped so they never
//! appear in a link.
//!
//! # Example
//!
//! ```
//! use backoffice_core::location::{InMemoryLocation, Location};
//! use backoffice_core::query_state::{PaginationUpdate, QueryStateBinding, View};
//!
//! let location = InMemoryLocation::new();
//! let binding = QueryStateBinding::new(View::Orders, location.clone());
//!
//! binding.write_pagination(PaginationUpdate::page(3));
//! binding.write_sorting("-created_at");
//! assert_eq!(location.href("/orders"), "/orders?order=-created_at&page=3");
//!
//! binding.write_pagination(PaginationUpdate::page(1));
//! assert_eq!(location.href("/orders"), "/orders?order=-created_at");
//! ```

use crate::location::Location;
use crate::params::{AddressParameters, AddressPatch, ParamValue};
use crate::search::{ORDER, PAGE, PER_PAGE, SCHEMA_KEYS, SearchParams, SearchSchema, SearchValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page shown when `page` is absent.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when `per_page` is absent.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// List views of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Product catalogue.
    Products,
    /// Customer accounts.
    Customers,
    /// Orders.
    Orders,
    /// Analytics reports.
    Analytics,
}

impl View {
    /// Every list view.
    pub const ALL: [Self; 4] = [Self::Products, Self::Customers, Self::Orders, Self::Analytics];

    /// Route segment, shared by the console and the remote API.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Analytics => "analytics",
        }
    }

    /// Absolute route path.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.segment())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Current pagination. Both fields are ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Fill absent values with defaults.
    #[must_use]
    pub fn from_search(search: &SearchParams) -> Self {
        Self {
            page: search.page.unwrap_or(DEFAULT_PAGE),
            per_page: search.per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64).saturating_sub(1) * self.per_page as u64
    }
}

/// Partial pagination write. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationUpdate {
    /// New page.
    pub page: Option<u32>,
    /// New page size.
    pub per_page: Option<u32>,
}

impl PaginationUpdate {
    /// Change only the page.
    #[must_use]
    pub const fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: None,
        }
    }

    /// Change only the page size.
    #[must_use]
    pub const fn per_page(per_page: u32) -> Self {
        Self {
            page: None,
            per_page: Some(per_page),
        }
    }
}

impl From<Pagination> for PaginationUpdate {
    fn from(pagination: Pagination) -> Self {
        Self {
            page: Some(pagination.page),
            per_page: Some(pagination.per_page),
        }
    }
}

/// Per-view projection of the address.
#[derive(Debug, Clone)]
pub struct QueryStateBinding<L> {
    view: View,
    location: L,
}

impl<L: Location> QueryStateBinding<L> {
    /// Bind a view to a location.
    pub const fn new(view: View, location: L) -> Self {
        Self { view, location }
    }

    /// The bound view.
    pub const fn view(&self) -> View {
        self.view
    }

    /// The underlying location.
    pub const fn location(&self) -> &L {
        &self.location
    }

    /// Validated snapshot of the current address.
    ///
    /// # Errors
    ///
    /// Returns [`SearchValidationError`] when the address is malformed.
    pub fn search(&self) -> Result<SearchParams, SearchValidationError> {
        SearchSchema::validate(&self.location.read()).inspect_err(|err| {
            tracing::warn!(view = %self.view, fields = ?err.fields(), "Rejected address parameters");
            metrics::counter!("backoffice_search_rejections_total", "view" => self.view.segment())
                .increment(1);
        })
    }

    /// Current pagination, defaults substituted for absent keys.
    ///
    /// # Errors
    ///
    /// Returns [`SearchValidationError`] when the address is malformed.
    pub fn read_pagination(&self) -> Result<Pagination, SearchValidationError> {
        self.search().map(|search| Pagination::from_search(&search))
    }

    /// Merge a pagination update into the address.
    ///
    /// `page` and `per_page` are judged independently: whichever ends up equal
    /// to its default is removed from the address, the other is written.
    /// Every other key is left untouched. A zero value is not a page: it is
    /// logged and left out of the write, keeping the current value.
    pub fn write_pagination(&self, update: PaginationUpdate) {
        let view = self.view;
        let update = PaginationUpdate {
            page: positive(view, PAGE, update.page),
            per_page: positive(view, PER_PAGE, update.per_page),
        };
        if update == PaginationUpdate::default() {
            return;
        }
        self.location.update(&|current| {
            let mut patch = AddressPatch::new();
            if let Some(page) = update.page {
                patch = strip_default(patch, PAGE, page, DEFAULT_PAGE);
            }
            if let Some(per_page) = update.per_page {
                patch = strip_default(patch, PER_PAGE, per_page, DEFAULT_PER_PAGE);
            }
            tracing::debug!(
                %view,
                keys = ?patch.keys().collect::<Vec<_>>(),
                before = %current.to_query(),
                "Writing pagination"
            );
            patch
        });
    }

    /// Current sort token.
    ///
    /// # Errors
    ///
    /// Returns [`SearchValidationError`] when the address is malformed.
    pub fn read_sorting(&self) -> Result<Option<String>, SearchValidationError> {
        self.search().map(|search| search.order)
    }

    /// Set the sort token. There is no default to strip, so it is always
    /// written.
    pub fn write_sorting(&self, order: impl Into<String>) {
        let order = order.into();
        self.location
            .update(&|_| AddressPatch::new().set(ORDER, order.clone()));
    }

    /// A view-specific filter value. Schema keys are not filters.
    #[must_use]
    pub fn read_filter(&self, key: &str) -> Option<ParamValue> {
        if SCHEMA_KEYS.contains(&key) {
            return None;
        }
        self.location.read().get(key).cloned()
    }

    /// Set (`Some`) or clear (`None`) a view-specific filter.
    ///
    /// Schema keys are refused; pagination and sorting have their own writers.
    pub fn write_filter(&self, key: &str, value: Option<ParamValue>) {
        if SCHEMA_KEYS.contains(&key) {
            tracing::warn!(view = %self.view, key, "Refusing to write schema key as a filter");
            return;
        }
        self.location.update(&|_| match &value {
            Some(value) => AddressPatch::new().set(key, value.clone()),
            None => AddressPatch::new().remove(key),
        });
    }

    /// View-specific filters currently in the address.
    #[must_use]
    pub fn filters(&self) -> AddressParameters {
        let mut params = self.location.read();
        for key in SCHEMA_KEYS {
            params.remove(key);
        }
        params
    }

    /// Shareable link to the view in its current state.
    pub fn href(&self) -> String {
        self.location.href(&self.view.path())
    }
}

fn positive(view: View, key: &str, value: Option<u32>) -> Option<u32> {
    if value == Some(0) {
        tracing::warn!(%view, key, "Ignoring non-positive pagination value");
        return None;
    }
    value
}

fn strip_default(patch: AddressPatch, key: &str, value: u32, default: u32) -> AddressPatch {
    if value == default {
        patch.remove(key)
    } else {
        patch.set(key, value.to_string())
    }
}
