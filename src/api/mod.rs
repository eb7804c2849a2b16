//! HTTP surface: REST handlers, DTOs, OpenAPI document, router composition.
//!
//! REST endpoints live under `/api/v1`; `/health` and the `/ws` upgrade
//! endpoint are mounted at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI description of every HTTP endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::system::health_handler,
        handlers::subscriber::list_subscribers,
        crate::ws::handler::ws_handler,
    ),
    tags(
        (name = "Chat", description = "Chat room membership and relay"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the REST router.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the complete application: REST, WebSocket, docs, and layers.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
