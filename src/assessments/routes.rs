use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::warn;

use super::catalog::DefinitionCatalog;
use super::submission::{ResultPayload, ResultRepository};

/// Content-site surface for the assessment engine: definition reads for the
/// embedded test pages and the result persistence endpoint.
pub struct AssessmentApi<C, R> {
    catalog: Arc<C>,
    repository: Arc<R>,
}

impl<C, R> AssessmentApi<C, R> {
    pub fn new(catalog: Arc<C>, repository: Arc<R>) -> Self {
        Self {
            catalog,
            repository,
        }
    }
}

pub fn assessment_router<C, R>(api: Arc<AssessmentApi<C, R>>) -> Router
where
    C: DefinitionCatalog + 'static,
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/tests/:slug", get(get_test_handler::<C, R>))
        .route("/api/saveTestResult", post(save_result_handler::<C, R>))
        .with_state(api)
}

async fn get_test_handler<C, R>(
    State(api): State<Arc<AssessmentApi<C, R>>>,
    Path(slug): Path<String>,
) -> Response
where
    C: DefinitionCatalog + 'static,
    R: ResultRepository + 'static,
{
    match api.catalog.active_by_slug(&slug) {
        Ok(Some(definition)) => (StatusCode::OK, axum::Json(definition)).into_response(),
        Ok(None) => not_found(&slug),
        Err(error) => {
            // Store failures are deliberately indistinguishable from a
            // missing test on this surface.
            warn!(%slug, %error, "definition lookup failed");
            not_found(&slug)
        }
    }
}

fn not_found(slug: &str) -> Response {
    let payload = json!({
        "error": "test not found",
        "slug": slug,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

async fn save_result_handler<C, R>(
    State(api): State<Arc<AssessmentApi<C, R>>>,
    axum::Json(payload): axum::Json<ResultPayload>,
) -> Response
where
    C: DefinitionCatalog + 'static,
    R: ResultRepository + 'static,
{
    match api.repository.save(payload) {
        Ok(record) => {
            let body = json!({
                "success": true,
                "resultId": record.result_id,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            warn!(%error, "result persistence failed");
            let body = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
        }
    }
}
