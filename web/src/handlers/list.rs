//! List-view loader.
//!
//! `GET /{view}` validates the address, asks the remote API for the matching
//! page and answers with the normalized outcome plus navigation links.
//!
//! # Flow
//!
//! 1. Decode the query into a per-request location
//! 2. Validate through the search schema (hard `400` on failure)
//! 3. Forward the canonical parameters to the remote `GET /{view}`, pagination
//!    always explicit
//! 4. Normalize the result into an `ActionOutcome`
//! 5. Compute `self`/`first`/`prev`/`next` links on copies of the location

use crate::error::AppError;
use crate::extractors::{AddressQuery, CorrelationId};
use crate::outcome::outcome_status;
use crate::state::AppState;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use backoffice_core::search::{CREATED_AT, ORDER, PAGE, PER_PAGE, UPDATED_AT};
use backoffice_core::{
    ActionOutcome, AddressParameters, ApiRequest, DEFAULT_PAGE, HttpTransport, InMemoryLocation,
    OutcomeBuilder, Pagination, PaginationUpdate, ParamValue, QueryStateBinding, SearchParams,
    View,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Navigation links of a list page, all in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLinks {
    /// The page as requested.
    #[serde(rename = "self")]
    pub current: String,
    /// First page.
    pub first: String,
    /// Previous page, absent on the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Next page.
    pub next: String,
}

/// Body of a list-view response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Normalized result of the remote call.
    pub outcome: ActionOutcome,
    /// Remote body on success, `null` on failure.
    pub data: Value,
    /// Effective pagination, defaults applied.
    pub pagination: Pagination,
    /// Sort token, if any.
    pub order: Option<String>,
    /// Navigation links.
    pub links: ListLinks,
}

/// Router serving every [`View`] at its path.
pub fn list_router<T>(state: AppState<T>) -> Router
where
    T: HttpTransport + Clone + 'static,
{
    View::ALL
        .into_iter()
        .fold(Router::new(), |router, view| {
            router.route(
                &view.path(),
                get(
                    move |state: State<AppState<T>>, id: CorrelationId, query: AddressQuery| {
                        list_view(view, state, id, query)
                    },
                ),
            )
        })
        .with_state(state)
}

/// Load one page of `view`.
///
/// # Errors
///
/// Returns `400 Bad Request` with code `INVALID_SEARCH_PARAMS` when the
/// address fails validation. Remote failures are not errors: they come back
/// as an outcome, with the upstream status for client errors and
/// `502 Bad Gateway` otherwise.
pub async fn list_view<T>(
    view: View,
    State(state): State<AppState<T>>,
    correlation_id: CorrelationId,
    AddressQuery(params): AddressQuery,
) -> Result<(StatusCode, Json<ListResponse>), AppError>
where
    T: HttpTransport + Clone,
{
    let binding = QueryStateBinding::new(view, InMemoryLocation::with_params(params));
    let search = binding.search()?;
    let pagination = Pagination::from_search(&search);

    let remote = remote_params(&binding.filters(), &search, pagination);
    let request = ApiRequest::get(format!("{}?{}", view.path(), remote.to_query()));
    tracing::debug!(
        correlation_id = %correlation_id.0,
        %view,
        path = %request.path,
        "Loading list view"
    );

    let result = state.transport.request(request).await;
    let outcome = OutcomeBuilder::from_result(&result, None);
    if let Err(failure) = &result {
        tracing::warn!(
            correlation_id = %correlation_id.0,
            %view,
            status = ?failure.status,
            "Remote list request failed"
        );
    }
    let data = result.map(|response| response.data).unwrap_or(Value::Null);

    let body = ListResponse {
        data,
        pagination,
        order: search.order,
        links: links(&binding, pagination),
        outcome,
    };
    Ok((outcome_status(&body.outcome), Json(body)))
}

/// Parameters sent to the remote API: filters as given, schema keys in
/// canonical form, pagination always explicit.
fn remote_params(
    filters: &AddressParameters,
    search: &SearchParams,
    pagination: Pagination,
) -> AddressParameters {
    let mut remote = filters.clone();
    for (key, range) in [(CREATED_AT, &search.created_at), (UPDATED_AT, &search.updated_at)] {
        if let Some(range) = range {
            remote.insert(key, ParamValue::Many(range.to_strings()));
        }
    }
    if let Some(order) = &search.order {
        remote.insert(ORDER, order.clone());
    }
    remote.insert(PAGE, pagination.page.to_string());
    remote.insert(PER_PAGE, pagination.per_page.to_string());
    remote
}

fn links(binding: &QueryStateBinding<InMemoryLocation>, pagination: Pagination) -> ListLinks {
    let link_to = |page: u32| {
        let copy = QueryStateBinding::new(binding.view(), binding.location().fork());
        copy.write_pagination(PaginationUpdate::from(Pagination { page, ..pagination }));
        copy.href()
    };

    ListLinks {
        current: link_to(pagination.page),
        first: link_to(DEFAULT_PAGE),
        prev: (pagination.page > DEFAULT_PAGE).then(|| link_to(pagination.page - 1)),
        next: link_to(pagination.page.saturating_add(1)),
    }
}
