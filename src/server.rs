//! HTTP query surface.
//!
//! Three read-only routes over the query engine. Every response is a
//! 200 with a structured JSON body; failures travel in the payload's
//! `error` field so the dashboard never sees an unstructured crash.

use crate::query::{CostsOverview, MonthlyTrend, QueryEngine, ServiceDetail};
use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub fn router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/api/costs/{period}", get(costs_overview))
        .route("/api/costs/{period}/{service}", get(service_trend))
        .route("/api/costs/{period}/{service}/details", get(service_details))
        .with_state(engine)
}

async fn costs_overview(
    State(engine): State<Arc<QueryEngine>>,
    Path(period): Path<String>,
) -> Json<CostsOverview> {
    Json(engine.overview(&period))
}

async fn service_trend(
    State(engine): State<Arc<QueryEngine>>,
    Path((_period, service)): Path<(String, String)>,
) -> Json<MonthlyTrend> {
    Json(engine.service_trend(&service))
}

async fn service_details(
    State(engine): State<Arc<QueryEngine>>,
    Path((period, service)): Path<(String, String)>,
) -> Json<ServiceDetail> {
    Json(engine.details(&period, &service))
}

pub async fn serve(engine: Arc<QueryEngine>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "query surface listening");
    axum::serve(listener, router(engine)).await?;
    Ok(())
}
