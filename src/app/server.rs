use crate::app::responses::{all_transfers_error, AllTransfersBody};
use crate::core::fetcher::TransferFetcher;
use crate::domain::model::Group;
use crate::domain::ports::PageSource;
use crate::utils::error::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub struct AppState<P: PageSource> {
    pub fetcher: TransferFetcher<P>,
}

impl<P: PageSource> AppState<P> {
    pub fn new(fetcher: TransferFetcher<P>) -> Self {
        Self { fetcher }
    }
}

pub fn router<P: PageSource + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/transfers", get(api_transfers::<P>))
        .route("/api/transfers/{team}", get(api_transfers_team::<P>))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Bind and serve until Ctrl-C.
pub async fn serve<P: PageSource + 'static>(bind: &str, fetcher: TransferFetcher<P>) -> Result<()> {
    let app = router(Arc::new(AppState::new(fetcher)));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("🚀 transfer-scout listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// --- Handlers ---

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn api_transfers<P: PageSource + 'static>(State(state): State<Arc<AppState<P>>>) -> Response {
    match state.fetcher.fetch_all().await {
        Ok(report) => Json(AllTransfersBody::from(report)).into_response(),
        Err(e) => all_transfers_error(e),
    }
}

async fn api_transfers_team<P: PageSource + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Path(team): Path<String>,
) -> Response {
    let group = match Group::parse(&team) {
        Ok(group) => group,
        Err(e) => return e.into_response(),
    };

    match state.fetcher.fetch_listings(group).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => e.into_response(),
    }
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("❌ Handler panicked while building a response");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal error while processing the transfer list" })),
    )
        .into_response()
}
