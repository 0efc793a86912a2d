//! Catalog selection-table route handler.
//!
//! The table is an HTMX fragment: searching, sorting, and paging all
//! re-request this route and swap the fragment in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Catalog, CatalogEntry, CatalogSort};
use crate::state::AppState;

/// Articles shown per page.
pub const PAGE_SIZE: usize = 10;

/// Stock allocation row display data.
#[derive(Clone)]
pub struct StockRowView {
    pub location: String,
    pub batch: String,
    pub available: u32,
}

/// Catalog row display data.
#[derive(Clone)]
pub struct CatalogRowView {
    pub id: String,
    pub code: String,
    pub description: String,
    pub balance: String,
    pub is_composite: bool,
    pub stock: Vec<StockRowView>,
}

impl From<&CatalogEntry> for CatalogRowView {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            code: entry.code.clone(),
            description: entry.description.clone(),
            balance: if entry.is_composite() {
                "-".to_string()
            } else {
                entry
                    .balance
                    .map_or_else(|| "-".to_string(), |balance| balance.to_string())
            },
            is_composite: entry.is_composite(),
            stock: entry
                .stock
                .iter()
                .map(|stock| StockRowView {
                    location: stock.location.clone(),
                    batch: stock.batch.clone(),
                    available: stock.available,
                })
                .collect(),
        }
    }
}

/// One sort-dropdown option.
#[derive(Clone)]
pub struct SortOptionView {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// Full catalog-table display data.
#[derive(Clone)]
pub struct CatalogTableView {
    pub query: String,
    pub sort_key: String,
    pub sorts: Vec<SortOptionView>,
    pub rows: Vec<CatalogRowView>,
    pub page: usize,
    pub page_count: usize,
    pub shown: usize,
    pub total: usize,
}

/// Build the table view for a search/sort/page combination.
#[must_use]
pub fn table_view(catalog: &Catalog, query: &str, sort: CatalogSort, page: usize) -> CatalogTableView {
    let matches = catalog.search(query, sort);
    let total = matches.len();
    let page_count = total.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, page_count);

    let rows: Vec<CatalogRowView> = matches
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|entry| CatalogRowView::from(*entry))
        .collect();

    CatalogTableView {
        query: query.to_string(),
        sort_key: sort.key().to_string(),
        sorts: CatalogSort::ALL
            .into_iter()
            .map(|option| SortOptionView {
                key: option.key().to_string(),
                label: option.label().to_string(),
                selected: option == sort,
            })
            .collect(),
        shown: rows.len(),
        rows,
        page,
        page_count,
        total,
    }
}

/// Catalog table query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub orden: Option<String>,
    pub pagina: Option<usize>,
}

/// Catalog table fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_table.html")]
pub struct CatalogTableTemplate {
    pub catalog: CatalogTableView,
}

/// Render the catalog table fragment.
#[instrument(skip(state))]
pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let sort = params
        .orden
        .as_deref()
        .and_then(|key| key.parse().ok())
        .unwrap_or_default();
    let page = params.pagina.unwrap_or(1);

    CatalogTableTemplate {
        catalog: table_view(state.catalog(), &query, sort, page),
    }
}
