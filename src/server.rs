use crate::callbacks::{CallbackError, Dependency, Inputs, Registry};
use crate::config::AppConfig;
use crate::layout::render_page;
use crate::render::{bubble_map, Figure};
use crate::types::Dataset;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Everything a request can see. Built once and never mutated.
pub struct AppState {
    pub dataset: Dataset,
    pub registry: Registry,
    pub map: Figure,
    pub page: String,
    /// Changes on every process start; pages in debug mode reload when it does.
    pub reload_hash: String,
}

impl AppState {
    pub fn new(dataset: Dataset, hot_reload: bool) -> Self {
        let map = bubble_map(&dataset);
        let started = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self {
            dataset,
            registry: Registry::dashboard(),
            map,
            page: render_page(hot_reload),
            reload_hash: format!("{:x}", started),
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    output: String,
    #[serde(default)]
    inputs: Inputs,
}

#[derive(Serialize)]
pub struct UpdateResponse {
    output: String,
    figure: Figure,
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let status = match self {
            CallbackError::UnknownOutput(_) => StatusCode::NOT_FOUND,
            CallbackError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub fn build_router(config: &AppConfig, state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/api/dependencies", get(dependencies_handler))
        .route("/api/update", post(update_handler))
        .route("/api/map", get(map_handler))
        .nest_service("/assets", ServeDir::new(&config.server.assets_dir));

    if config.server.debug {
        app = app.route("/api/reload-hash", get(reload_hash_handler));
    }

    let app = app.layer(CorsLayer::permissive()).with_state(state);

    if config.server.debug {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

pub async fn start_server(config: AppConfig, dataset: Dataset) -> Result<()> {
    info!("Building dashboard for {} countries...", dataset.len());
    let state = Arc::new(AppState::new(dataset, config.server.debug));

    let addr = config.server.bind_addr();
    info!("Starting server on http://{}", addr);

    let app = build_router(&config, state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn dependencies_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Dependency>> {
    Json(state.registry.dependencies())
}

async fn reload_hash_handler(State(state): State<Arc<AppState>>) -> String {
    state.reload_hash.clone()
}

async fn map_handler(State(state): State<Arc<AppState>>) -> Json<Figure> {
    Json(state.map.clone())
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, CallbackError> {
    let figure = state
        .registry
        .dispatch(&request.output, &request.inputs, &state.dataset)?;

    Ok(Json(UpdateResponse {
        output: request.output,
        figure,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::tests::sample_dataset;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        app_with_debug(true)
    }

    fn app_with_debug(debug: bool) -> Router {
        let mut config = AppConfig::default();
        config.server.debug = debug;
        let state = Arc::new(AppState::new(sample_dataset(), debug));
        build_router(&config, state)
    }

    async fn post_update(body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::post("/api/update")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Wine data analysis"));
        assert!(page.contains(r#"id="bubble-map""#));
    }

    #[tokio::test]
    async fn test_dependencies_endpoint() {
        let response = app()
            .oneshot(Request::get("/api/dependencies").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let deps: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            deps,
            json!([
                { "output": "average-price", "inputs": ["price-ceiling", "bar-toggle"] },
                { "output": "wine-count", "inputs": ["top-toggle"] }
            ])
        );
    }

    #[tokio::test]
    async fn test_update_renders_price_bar() {
        let (status, body) = post_update(json!({
            "output": "average-price",
            "inputs": { "price-ceiling": "30", "bar-toggle": true }
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], "average-price");
        assert_eq!(body["figure"]["data"][0]["type"], "bar");
        assert_eq!(
            body["figure"]["layout"]["title"]["text"],
            "5 countries with the highest average price up to $30"
        );
    }

    #[tokio::test]
    async fn test_update_without_inputs_uses_unset_controls() {
        let (status, body) = post_update(json!({ "output": "wine-count" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["figure"]["layout"]["title"]["text"], "5 countries with fewest wines");
    }

    #[tokio::test]
    async fn test_update_errors_map_to_status_codes() {
        let (status, body) = post_update(json!({ "output": "nope" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let (status, _) = post_update(json!({
            "output": "average-price",
            "inputs": { "price-ceiling": "cheap" }
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_map_endpoint() {
        let response = app()
            .oneshot(Request::get("/api/map").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let map: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(map["data"][0]["locations"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_reload_hash_only_in_debug() {
        let response = app()
            .oneshot(Request::get("/api/reload-hash").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!bytes.is_empty());

        let response = app_with_debug(false)
            .oneshot(Request::get("/api/reload-hash").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
