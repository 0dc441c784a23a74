use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use payments_dashboard::{Server, test_utils::TestServerBuilder};
use serde_json::Value;
use tower::ServiceExt;

/// Test harness wrapping a migrated in-memory server and its router
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();
        Self { server, app }
    }

    /// GET a path and decode the JSON body
    #[allow(dead_code)]
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}
