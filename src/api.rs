//! HTTP surface: `GET /{BASE}:{QUOTE}?amount=N` and `GET /health`.
//!
//! Everything the core treats as defined-but-degenerate (non-positive amounts,
//! malformed pairs) is turned away here with a 400, as are queries that do
//! not parse. Every rejection carries a JSON `{"error": ...}` body.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::types::{Pair, PairParseError, QuoteResult};
use crate::market_data::router::QuoteRouter;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Pair(#[from] PairParseError),
    #[error("amount must be a positive number, got {0}")]
    Amount(f64),
    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub amount: f64,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    sources: Vec<String>,
}

pub fn create_router(quotes: Arc<QuoteRouter>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:pair", get(quote))
        .with_state(quotes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// GET /health
async fn health(State(quotes): State<Arc<QuoteRouter>>) -> impl IntoResponse {
    let sources = quotes.aggregator().source_ids().into_iter().map(String::from).collect();
    Json(Health { status: "ok", sources })
}

/// GET /BTC:USDT?amount=3
async fn quote(
    State(quotes): State<Arc<QuoteRouter>>,
    Path(pair): Path<String>,
    params: Result<Query<QuoteParams>, QueryRejection>,
) -> Result<Json<QuoteResult>, ApiError> {
    let pair: Pair = pair.parse()?;
    let Query(params) = params?;
    if !(params.amount.is_finite() && params.amount > 0.0) {
        return Err(ApiError::Amount(params.amount));
    }
    Ok(Json(quotes.get_quote(&pair, params.amount).await))
}
