//! HTTP REST API routes

mod board_routes;
mod random_routes;
mod roll_routes;
mod room_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Randomness
        .route("/api/random", post(random_routes::random_bytes))
        .route("/api/roll", post(roll_routes::roll_dice))
        // Rooms
        .route("/api/new-room", post(room_routes::new_room))
        .route("/api/active-rooms", get(room_routes::active_rooms))
        .route("/api/rooms/{room}/users", get(room_routes::room_users))
        // Board backdrops
        .route(
            "/api/fetchPinterestBoardImages",
            post(board_routes::fetch_board_images),
        )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::application::ports::outbound::{BoardFeedError, BoardFeedPort, FixedRandomPort};
    use crate::domain::value_objects::ClientId;
    use crate::infrastructure::config::AppConfig;

    /// Board feed that answers with a canned result
    pub struct StubBoardFeed {
        result: Result<String, fn() -> BoardFeedError>,
    }

    impl StubBoardFeed {
        pub fn ok(xml: &str) -> Self {
            Self {
                result: Ok(xml.to_string()),
            }
        }

        pub fn failing(error: fn() -> BoardFeedError) -> Self {
            Self { result: Err(error) }
        }
    }

    #[async_trait]
    impl BoardFeedPort for StubBoardFeed {
        async fn fetch_board_feed(&self, _board_url: &str) -> Result<String, BoardFeedError> {
            match &self.result {
                Ok(xml) => Ok(xml.clone()),
                Err(make_error) => Err(make_error()),
            }
        }
    }

    fn state_with(random: Vec<u8>, board: StubBoardFeed) -> Arc<AppState> {
        let config = AppConfig {
            max_random_bytes: 16,
            ..AppConfig::default()
        };
        Arc::new(AppState::with_ports(
            config,
            Arc::new(FixedRandomPort::new(random)),
            Arc::new(board),
        ))
    }

    fn app(state: Arc<AppState>) -> Router {
        create_routes().with_state(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_random_returns_buffer_shape() {
        let state = state_with(vec![7, 8, 9], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json("/api/random", json!({"size": 4})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({"nums": {"type": "Buffer", "data": [7, 8, 9, 7]}}));
    }

    #[tokio::test]
    async fn test_random_rejects_oversized_request() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json("/api/random", json!({"size": 17})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_random_zero_size() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json("/api/random", json!({"size": 0})))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["nums"]["data"], json!([]));
    }

    #[tokio::test]
    async fn test_new_room_registers_and_counts() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));

        let response = app(state.clone())
            .oneshot(Request::builder().method("POST").uri("/api/new-room").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let name = body_json(response).await["name"].as_str().unwrap().to_string();
        assert_eq!(name.split('-').count(), 3);
        assert!(state.rooms.read().await.room_exists(&name));

        let response = app(state)
            .oneshot(get_req("/api/active-rooms"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!({"count": 1}));
    }

    #[tokio::test]
    async fn test_room_users() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        {
            let mut rooms = state.rooms.write().await;
            let client_id = ClientId::new();
            let (tx, _rx) = mpsc::unbounded_channel();
            rooms.join("table", client_id, tx).unwrap();
            rooms.set_username(client_id, "ada".to_string()).unwrap();
        }

        let response = app(state.clone())
            .oneshot(get_req("/api/rooms/table/users"))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"room": "table", "users": ["ada"]})
        );

        let response = app(state)
            .oneshot(get_req("/api/rooms/missing/users"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_roll_endpoint() {
        let state = state_with(vec![8, 2, 43], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json(
                "/api/roll",
                json!({"dice": [{"sides": 6, "count": 3}], "roller": "ada", "modifier": "2"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 10);
        assert_eq!(body["roller"], "ada");
        assert_eq!(body["dice"]["d6"]["results"], json!([8, 2, 43]));
    }

    #[tokio::test]
    async fn test_roll_without_dice_is_bad_request() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json("/api/roll", json!({"dice": [], "roller": "ada"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_roll_over_byte_limit_is_bad_request() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json(
                "/api/roll",
                json!({"dice": [{"sides": 6, "count": 5000}], "roller": "ada"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_roll_with_overflowing_count_is_bad_request() {
        let state = state_with(vec![1], StubBoardFeed::ok(""));
        let response = app(state)
            .oneshot(post_json(
                "/api/roll",
                json!({
                    "dice": [{"sides": 6, "count": 4294967295u32}, {"sides": 6, "count": 1}],
                    "roller": "ada"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_board_feed_proxied_as_xml() {
        let state = state_with(vec![1], StubBoardFeed::ok("<rss><channel/></rss>"));
        let response = app(state)
            .oneshot(post_json(
                "/api/fetchPinterestBoardImages",
                json!({"board": "https://www.pinterest.com/someone/board"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<rss><channel/></rss>");
    }

    #[tokio::test]
    async fn test_board_feed_error_statuses() {
        let state = state_with(
            vec![1],
            StubBoardFeed::failing(|| BoardFeedError::HostNotAllowed("example.com".into())),
        );
        let response = app(state)
            .oneshot(post_json(
                "/api/fetchPinterestBoardImages",
                json!({"board": "https://example.com/x"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let state = state_with(
            vec![1],
            StubBoardFeed::failing(|| BoardFeedError::UpstreamStatus(503)),
        );
        let response = app(state)
            .oneshot(post_json(
                "/api/fetchPinterestBoardImages",
                json!({"board": "https://www.pinterest.com/a/b"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
