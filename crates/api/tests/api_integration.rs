//! API integration tests.
//!
//! Drive the full router, auth middleware included, against an in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use shutter_api::{AppState, app};
use shutter_core::Services;
use shutter_db::{IdAllocator, test_utils::TestDatabase};
use tower::ServiceExt;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13];

struct TestApp {
    _db: TestDatabase,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let db = TestDatabase::new().await.unwrap();
        let state = AppState::from(Services::new(db.arc(), IdAllocator::default()));
        Self {
            router: app(state),
            _db: db,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send(req).await
    }

    async fn login(&self, name: &str) -> String {
        let (status, body) = self
            .call("POST", "/session", None, Some(json!({ "name": name })))
            .await;
        assert!(status == StatusCode::CREATED || status == StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn upload(&self, token: &str) -> String {
        let req = Request::builder()
            .method("POST")
            .uri("/photos")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(PNG.to_vec()))
            .unwrap();
        let (status, body) = self.send(req).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["photoId"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_liveness_is_public() {
    let app = TestApp::new().await;

    let (status, _) = app.call("GET", "/liveness", None, None).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_creates_then_reuses_user() {
    let app = TestApp::new().await;

    let (first, body) = app
        .call("POST", "/session", None, Some(json!({ "name": "maria" })))
        .await;
    assert_eq!(first, StatusCode::CREATED);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (second, body) = app
        .call("POST", "/session", None, Some(json!({ "name": "Maria" })))
        .await;
    assert_eq!(second, StatusCode::OK);
    assert_eq!(body["data"]["token"], token.as_str());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/stream", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = app.call("GET", "/stream", Some("not-a-user"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_conflict() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call("POST", "/users", None, Some(json!({ "username": "maria" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "maria");

    let (status, body) = app
        .call("POST", "/users", None, Some(json!({ "username": "MARIA" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_follow_upload_stream_and_ban() {
    let app = TestApp::new().await;
    let viewer = app.login("viewer").await;
    let author = app.login("author").await;

    let (status, _) = app
        .call("POST", &format!("/users/{author}/follows"), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app
        .call("GET", &format!("/follows/{author}"), Some(&viewer), None)
        .await;
    assert_eq!(body["data"]["followed"], true);

    let photo = app.upload(&author).await;
    let (_, body) = app.call("GET", "/stream", Some(&viewer), None).await;
    assert_eq!(body["data"], json!([photo]));

    let (status, _) = app
        .call("POST", &format!("/users/{author}/bans"), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.call("GET", "/stream", Some(&viewer), None).await;
    assert_eq!(body["data"], json!([]));

    // The author cannot ban back.
    let (status, body) = app
        .call("POST", &format!("/users/{viewer}/bans"), Some(&author), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app
        .call("DELETE", &format!("/users/{author}/bans"), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.call("GET", "/stream", Some(&viewer), None).await;
    assert_eq!(body["data"], json!([photo]));
}

#[tokio::test]
async fn test_self_follow_is_bad_request() {
    let app = TestApp::new().await;
    let me = app.login("maria").await;

    let (status, body) = app
        .call("POST", &format!("/users/{me}/follows"), Some(&me), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_OPERATION");
}

#[tokio::test]
async fn test_photo_detail_likes_comments_and_delete() {
    let app = TestApp::new().await;
    let owner = app.login("owner").await;
    let fan = app.login("fan").await;
    let photo = app.upload(&owner).await;

    let (status, _) = app
        .call("POST", &format!("/photos/{photo}/likes"), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .call("POST", &format!("/photos/{photo}/likes"), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            "POST",
            &format!("/photos/{photo}/comments"),
            Some(&fan),
            Some(json!({ "content": "stunning" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call("GET", &format!("/photos/{photo}"), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "owner");
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["comments"][0]["username"], "fan");
    assert_eq!(body["data"]["comments"][0]["content"], "stunning");
    assert_eq!(body["data"]["imageData"], "iVBORw0KGgoAAAAN");

    let (status, _) = app
        .call("DELETE", &format!("/photos/{photo}"), Some(&fan), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("DELETE", &format!("/photos/{photo}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .call("GET", &format!("/photos/{photo}"), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PHOTO_NOT_FOUND");
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let app = TestApp::new().await;
    let me = app.login("maria").await;

    let req = Request::builder()
        .method("POST")
        .uri("/photos")
        .header(header::AUTHORIZATION, format!("Bearer {me}"))
        .body(Body::from("definitely not an image"))
        .unwrap();
    let (status, _) = app.send(req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profiles_and_rename() {
    let app = TestApp::new().await;
    let me = app.login("maria").await;
    let other = app.login("lucas").await;
    app.call("POST", &format!("/users/{me}/follows"), Some(&other), None)
        .await;

    let (status, body) = app
        .call("GET", "/profiles/MARIA", Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], me.as_str());
    assert_eq!(body["data"]["followers"], json!([other]));

    let (status, _) = app
        .call(
            "PATCH",
            "/users/username",
            Some(&me),
            Some(json!({ "newUsername": "Lucas" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            "PATCH",
            "/users/username",
            Some(&me),
            Some(json!({ "newUsername": "mariana" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .call("GET", &format!("/users/{me}/username"), Some(&other), None)
        .await;
    assert_eq!(body["data"]["username"], "mariana");

    let (_, body) = app.call("GET", &format!("/users/{me}"), Some(&other), None).await;
    assert_eq!(body["data"]["username"], "mariana");
}

#[tokio::test]
async fn test_user_list_hides_banned_both_ways() {
    let app = TestApp::new().await;
    let a = app.login("anna").await;
    let b = app.login("ben").await;
    let c = app.login("cleo").await;
    app.call("POST", &format!("/users/{b}/bans"), Some(&a), None)
        .await;

    let (_, body) = app.call("GET", "/users", Some(&b), None).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["userId"].as_str().unwrap())
        .collect();

    assert!(ids.contains(&b.as_str()));
    assert!(ids.contains(&c.as_str()));
    assert!(!ids.contains(&a.as_str()));
}
