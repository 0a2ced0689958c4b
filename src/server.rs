//! HTTP query endpoint.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::aggregator::Aggregator;
use crate::models::QuoteRecord;

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub origin_chain: String,
    pub destination_chain: String,
    pub origin_token: String,
    pub destination_token: String,
    /// Whole units of the origin token.
    pub amount: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuoteResponse {
    Success { quotes: Vec<QuoteRecord> },
    Error { message: String },
}

pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/get_quote", get(get_quote))
        .layer(TraceLayer::new_for_http())
        .with_state(aggregator)
}

/// GET /get_quote - ranked quotes for one route. Malformed query strings get
/// the same JSON error shape as failed resolutions.
pub async fn get_quote(
    State(aggregator): State<Aggregator>,
    query: Result<Query<QuoteParams>, QueryRejection>,
) -> (StatusCode, Json<QuoteResponse>) {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(error = %rejection, "rejected quote query");
            return (
                StatusCode::BAD_REQUEST,
                Json(QuoteResponse::Error { message: rejection.body_text() }),
            );
        }
    };
    debug!(?params, "quote request");
    let result = aggregator
        .get_quotes_for_amount(
            &params.origin_chain,
            &params.destination_chain,
            &params.origin_token,
            &params.destination_token,
            params.amount,
        )
        .await;

    match result {
        Ok(list) => (
            StatusCode::OK,
            Json(QuoteResponse::Success { quotes: list.into_records() }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(QuoteResponse::Error { message: e.to_string() }),
        ),
    }
}

pub async fn serve(aggregator: Aggregator, listen: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {}", listen))?;
    info!("listening on {}", listen);
    axum::serve(listener, router(aggregator)).await.context("server error")
}
