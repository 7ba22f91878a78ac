//! HTTP surface: the telemetry endpoint plus a landing page.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use catchpoint_collector::{exposition, Collector};
use std::sync::Arc;
use tracing::error;

const CONTENT_TYPE_TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub landing_page: String,
}

pub fn build_app(collector: Arc<Collector>, telemetry_path: &str) -> Router {
    let state = AppState {
        collector,
        landing_page: landing_page(telemetry_path),
    };

    Router::new()
        .route("/", get(serve_landing_page))
        .route(telemetry_path, get(serve_metrics))
        .with_state(state)
}

/// Runs a full collection pass and renders it in Prometheus text format.
/// Collection itself cannot fail; a render failure is a 500.
async fn serve_metrics(State(state): State<AppState>) -> Response {
    let observations = state.collector.collect().await;
    match exposition::render(&observations) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render metrics").into_response()
        }
    }
}

async fn serve_landing_page(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.clone())
}

fn landing_page(telemetry_path: &str) -> String {
    format!(
        "<html>\n<head><title>Catchpoint Exporter</title></head>\n<body>\n\
         <h1>Catchpoint Exporter</h1>\n\
         <p><a href=\"{telemetry_path}\">Metrics</a></p>\n\
         </body>\n</html>\n"
    )
}
