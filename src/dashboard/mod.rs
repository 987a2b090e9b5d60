//! Dashboard web server.
//!
//! Serves a server-rendered HTML page, SVG charts and a small JSON API over the
//! cleaned table. All handlers read from one immutable [`DashboardState`]; the
//! store highlight and CPI filter are recomputed per request from the query
//! string.
//!
//! Routes:
//! - `GET /?store=<id>&cpi=<all|holiday|non-holiday>`
//! - `GET /charts/holidays.svg`, `/charts/stores.svg?store=<id>`,
//!   `/charts/cpi.svg?filter=<...>`, `/charts/fuel.svg`
//! - `GET /api/summary`, `/api/stores`, `/api/stores/{store}`

pub mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    Analysis, CpiCorrelation, DatasetSummary, HolidaySummary, HolidayWeek, StoreEconomics, cpi_scatter,
};
use crate::clean::CleanTable;
use crate::domain::{CpiFilter, SalesRecord};
use crate::error::AppError;
use crate::plot::svg;

/// Everything the handlers need, computed once at startup.
#[derive(Debug)]
pub struct DashboardState {
    source: String,
    table: CleanTable,
    analysis: Analysis,
}

pub type SharedState = Arc<DashboardState>;

impl DashboardState {
    pub fn new(source: impl Into<String>, table: CleanTable, analysis: Analysis) -> SharedState {
        Arc::new(Self {
            source: source.into(),
            table,
            analysis,
        })
    }

    /// The requested store if it exists, else the first store.
    fn resolve_store(&self, requested: Option<u32>) -> Option<u32> {
        requested
            .and_then(|id| self.analysis.store(id).map(|s| s.store))
            .or_else(|| self.analysis.stores.first().map(|s| s.store))
    }

    fn store_weeks(&self, store: u32) -> &[SalesRecord] {
        let records = self.table.records();
        let start = records.partition_point(|r| r.store < store);
        let end = records.partition_point(|r| r.store <= store);
        &records[start..end]
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/charts/holidays.svg", get(holidays_chart))
        .route("/charts/stores.svg", get(stores_chart))
        .route("/charts/cpi.svg", get(cpi_chart))
        .route("/charts/fuel.svg", get(fuel_chart))
        .route("/api/summary", get(api_summary))
        .route("/api/stores", get(api_stores))
        .route("/api/stores/{store}", get(api_store))
        .with_state(state)
}

/// Run the dashboard until Ctrl-C on a single-threaded runtime.
pub fn run(addr: SocketAddr, state: SharedState) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(serve(addr, state))
}

pub async fn serve(addr: SocketAddr, state: SharedState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::new(4, format!("Failed to bind dashboard address {addr}: {e}")))?;
    let local = listener.local_addr().unwrap_or(addr);
    info!("Dashboard server starting on http://{local}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::new(4, format!("Dashboard server error: {e}")))?;

    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub store: Option<u32>,
    pub cpi: Option<CpiFilter>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub store: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CpiQuery {
    pub filter: Option<CpiFilter>,
}

/// GET / - the dashboard page
async fn index(State(state): State<SharedState>, Query(query): Query<PageQuery>) -> Html<String> {
    let store = state.resolve_store(query.store);
    let filter = query.cpi.unwrap_or_default();
    debug!("GET / store={store:?} cpi={}", filter.as_str());
    Html(page::render_page(&state.source, &state.analysis, store, filter))
}

/// GET /charts/holidays.svg
async fn holidays_chart(State(state): State<SharedState>) -> Response {
    svg_response(svg::holiday_sales_chart(&state.analysis.holiday_summaries))
}

/// GET /charts/stores.svg?store=<id>
async fn stores_chart(State(state): State<SharedState>, Query(query): Query<StoreQuery>) -> Response {
    let store = state.resolve_store(query.store);
    debug!("GET /charts/stores.svg store={store:?}");
    svg_response(svg::store_sales_chart(&state.analysis.stores, store))
}

/// GET /charts/cpi.svg?filter=<all|holiday|non-holiday>
async fn cpi_chart(State(state): State<SharedState>, Query(query): Query<CpiQuery>) -> Response {
    let filter = query.filter.unwrap_or_default();
    debug!("GET /charts/cpi.svg filter={}", filter.as_str());
    let scatter = cpi_scatter(state.table.records(), filter);
    svg_response(svg::cpi_scatter_chart(&scatter))
}

/// GET /charts/fuel.svg
async fn fuel_chart(State(state): State<SharedState>) -> Response {
    svg_response(svg::fuel_sales_chart(&state.analysis.fuel_series))
}

#[derive(Serialize)]
struct SummaryBody<'a> {
    source: &'a str,
    summary: &'a DatasetSummary,
    cpi_correlation: &'a CpiCorrelation,
    holiday_ranking: &'a [HolidayWeek],
    holiday_summaries: &'a [HolidaySummary],
}

/// GET /api/summary
async fn api_summary(State(state): State<SharedState>) -> Response {
    let a = &state.analysis;
    Json(SummaryBody {
        source: &state.source,
        summary: &a.summary,
        cpi_correlation: &a.cpi_correlation,
        holiday_ranking: &a.holiday_ranking,
        holiday_summaries: &a.holiday_summaries,
    })
    .into_response()
}

/// GET /api/stores
async fn api_stores(State(state): State<SharedState>) -> Response {
    Json(&state.analysis.stores).into_response()
}

#[derive(Serialize)]
struct StoreDetail<'a> {
    #[serde(flatten)]
    economics: &'a StoreEconomics,
    records: &'a [SalesRecord],
}

/// GET /api/stores/{store}
async fn api_store(State(state): State<SharedState>, Path(store): Path<u32>) -> Response {
    match state.analysis.store(store) {
        Some(economics) => Json(StoreDetail {
            economics,
            records: state.store_weeks(store),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, format!("Store {store} not found")).into_response(),
    }
}

fn svg_response(rendered: Result<String, AppError>) -> Response {
    match rendered {
        Ok(body) => ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response(),
        Err(e) => {
            error!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
