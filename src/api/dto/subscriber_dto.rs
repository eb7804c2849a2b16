//! Subscriber listing DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Response body for `GET /subscribers`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberListResponse {
    /// Number of connected subscribers.
    pub count: usize,
    /// Subscriber names in join order.
    pub subscribers: Vec<String>,
}

impl From<Vec<String>> for SubscriberListResponse {
    fn from(subscribers: Vec<String>) -> Self {
        Self {
            count: subscribers.len(),
            subscribers,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_names() {
        let resp = SubscriberListResponse::from(vec!["alice".to_string(), "bob".to_string()]);
        let Ok(json) = serde_json::to_string(&resp) else {
            panic!("serialization failed");
        };
        assert_eq!(json, r#"{"count":2,"subscribers":["alice","bob"]}"#);
    }
}
