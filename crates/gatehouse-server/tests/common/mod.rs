//! Common test utilities and harness for the server integration tests.

use axum::body::{to_bytes, Body};
use axum::response::Response;
use axum::Router;
use gatehouse_auth::Backend;
use gatehouse_core::{Config, Environment, UserRole};
use gatehouse_server::{app, AppState};
use http::{header, Method, Request};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session secret the harness hands out in cookies.
pub const SECRET: &str = "secret-1";

/// Test harness: a mock platform and an app pointed at it.
pub struct TestHarness {
    /// Mock Appwrite platform.
    pub platform: MockServer,
    /// The application under test.
    pub app: Router,
}

impl TestHarness {
    /// Starts a mock platform and builds the app against it.
    pub async fn new() -> Self {
        let platform = MockServer::start().await;
        let backend = Backend::new(config(&platform)).unwrap();
        let app = app(AppState::from(backend)).unwrap();
        Self { platform, app }
    }

    /// Sends a request through the full router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// `GET path` with an optional cookie header.
    pub async fn get(&self, uri: &str, cookies: Option<&str>) -> Response {
        self.send(request(Method::GET, uri, cookies, Body::empty()))
            .await
    }

    /// Method and JSON body with an optional cookie header.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        cookies: Option<&str>,
        body: Value,
    ) -> Response {
        let mut req = request(method, uri, cookies, Body::from(body.to_string()));
        req.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        self.send(req).await
    }

    /// `GET /v1/account` succeeds for [`SECRET`] as `user_id`.
    pub async fn mount_account(&self, user_id: &str) {
        Mock::given(method("GET"))
            .and(path("/v1/account"))
            .and(header_is("X-Appwrite-Session", SECRET))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(user_id)))
            .mount(&self.platform)
            .await;
    }

    /// The users table holds `user_id` with `role`.
    pub async fn mount_role(&self, user_id: &str, role: UserRole) {
        Mock::given(method("GET"))
            .and(path("/v1/tablesdb/db/tables/users/rows"))
            .and(query_param(
                "queries[]",
                format!(r#"{{"method":"equal","attribute":"userId","values":["{user_id}"]}}"#),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "rows": [{
                    "$id": "row-1", "userId": user_id, "name": "Alice",
                    "email": "alice@example.com", "role": role.as_str()
                }]
            })))
            .mount(&self.platform)
            .await;
    }
}

fn config(platform: &MockServer) -> Config {
    let mut config = Config::default();
    config.app.url = "https://app.example.com".to_string();
    config.app.environment = Environment::Test;
    config.appwrite.endpoint = format!("{}/v1", platform.uri());
    config.appwrite.project_id = "test-project".to_string();
    config.appwrite.api_key = "test-key".to_string();
    config.appwrite.database_id = "db".to_string();
    config.appwrite.users_table_id = "users".to_string();
    config.appwrite.bucket_id = "bucket".to_string();
    config.network.max_retries = 0;
    config.network.retry_delay_ms = 1;
    config
}

fn request(method: Method, uri: &str, cookies: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(body).unwrap()
}

/// Platform user document.
pub fn user_json(id: &str) -> Value {
    json!({ "$id": id, "name": "Alice", "email": "alice@example.com" })
}

/// Cookie header for a logged-in user with `role`.
pub fn session_cookies(role: UserRole) -> String {
    format!("user_session={SECRET}; user_role={}", role.as_str())
}

/// Response body parsed as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `Location` header of a redirect.
pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// `Set-Cookie` headers of a response.
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
