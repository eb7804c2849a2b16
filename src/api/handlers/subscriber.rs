//! Subscriber listing handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SubscriberListResponse;
use crate::app_state::AppState;

/// `GET /subscribers` — Names of all connected clients.
#[utoipa::path(
    get,
    path = "/api/v1/subscribers",
    tag = "Chat",
    summary = "List connected subscribers",
    description = "Returns the names of every currently connected chat client in join order.",
    responses(
        (status = 200, description = "Connected subscribers", body = SubscriberListResponse),
    )
)]
pub async fn list_subscribers(State(state): State<AppState>) -> impl IntoResponse {
    let names = state.registry.names().await;
    (StatusCode::OK, Json(SubscriberListResponse::from(names)))
}

/// Subscriber routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/subscribers", get(list_subscribers))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::testing::FakeConnection;
    use crate::domain::{Connection, EventBus, Registry};

    #[tokio::test]
    async fn lists_names_in_join_order() {
        let registry = Arc::new(Registry::new());
        for name in ["carol", "alice"] {
            let conn: Arc<dyn Connection> = Arc::new(FakeConnection::new());
            if registry.join(name, conn).await.is_err() {
                panic!("join failed");
            }
        }
        let (event_bus, _stream) = EventBus::new(4);
        let state = AppState {
            registry,
            event_bus,
            outbound_queue_capacity: 4,
            send_timeout: Duration::from_secs(1),
        };

        let app = routes().with_state(state);
        let Ok(request) = Request::builder().uri("/subscribers").body(Body::empty()) else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), 1024).await else {
            panic!("body read failed");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("invalid json");
        };
        assert_eq!(
            body,
            serde_json::json!({"count": 2, "subscribers": ["carol", "alice"]})
        );
    }
}
