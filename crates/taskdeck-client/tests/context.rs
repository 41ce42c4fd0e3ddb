//! End-to-end tests for the application context against a mock service.

use std::time::Duration;

use serde_json::json;
use taskdeck_auth::{FileTokenStore, StoredCredentials, TokenStore};
use taskdeck_client::Taskdeck;
use taskdeck_settings::{ApiSettings, StorageSettings, TaskdeckSettings};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": "pending",
        "created_at": "2024-05-01T10:00:00Z",
        "user": 1
    })
}

fn settings(server: &MockServer, dir: &TempDir) -> TaskdeckSettings {
    TaskdeckSettings {
        api: ApiSettings {
            base_url: server.uri(),
            timeout_ms: 2_000,
            ..ApiSettings::default()
        },
        storage: StorageSettings {
            data_dir: dir.path().to_path_buf(),
        },
        ..TaskdeckSettings::default()
    }
}

async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(1, "Buy milk")])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/statistics/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 1,
            "pending_tasks": 1
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/motivacional/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1",
            "user": {"id": 1, "username": "ana"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn start_without_session_stays_offline() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = Taskdeck::from_settings(settings(&server, &dir));

    assert!(!app.start().await);

    assert!(!app.auth().is_authenticated());
    assert!(app.store().state().tasks.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn start_with_valid_session_loads_dashboard() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    FileTokenStore::in_dir(dir.path())
        .save(&StoredCredentials::new("a0", "r0", None))
        .unwrap();
    Mock::given(method("POST"))
        .and(path("/token/verify/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    mount_dashboard(&server).await;

    let app = Taskdeck::from_settings(settings(&server, &dir));
    assert!(app.start().await);

    let state = app.store().state();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.statistics.unwrap().total_tasks, 1);
    assert!(state.quote.unwrap().is_offline_fallback());
}

#[tokio::test]
async fn start_with_rejected_session_clears_credentials() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = FileTokenStore::in_dir(dir.path());
    tokens
        .save(&StoredCredentials::new("stale", "r0", None))
        .unwrap();
    Mock::given(method("POST"))
        .and(path("/token/verify/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired"
        })))
        .mount(&server)
        .await;

    let app = Taskdeck::from_settings(settings(&server, &dir));
    assert!(!app.start().await);

    assert!(tokens.load().is_none());
    assert!(app.store().state().tasks.is_empty());
}

#[tokio::test]
async fn login_persists_tokens_and_loads_dashboard() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_login(&server).await;
    mount_dashboard(&server).await;

    let app = Taskdeck::from_settings(settings(&server, &dir));
    assert!(app.login("ana", "secret").await);

    assert!(app.auth().is_authenticated());
    assert_eq!(app.tokens().access_token().as_deref(), Some("a1"));
    assert_eq!(app.store().state().tasks.len(), 1);

    let task_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path().starts_with("/tasks/"))
        .collect::<Vec<_>>();
    assert!(!task_requests.is_empty());
    for request in task_requests {
        let auth = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        assert_eq!(auth, Some("Bearer a1"));
    }
}

#[tokio::test]
async fn sign_out_clears_everything() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_login(&server).await;
    mount_dashboard(&server).await;

    let app = Taskdeck::from_settings(settings(&server, &dir));
    assert!(app.login("ana", "secret").await);

    app.sign_out();

    assert!(!app.auth().is_authenticated());
    assert!(app.tokens().load().is_none());
    assert!(app.store().state().tasks.is_empty());
}

#[tokio::test]
async fn server_revoked_session_signs_out() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(1, "Buy milk")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .mount(&server)
        .await;
    mount_dashboard(&server).await;

    let app = Taskdeck::from_settings(settings(&server, &dir));
    assert!(app.login("ana", "secret").await);
    assert_eq!(app.store().state().tasks.len(), 1);

    app.store().fetch_tasks().await;

    tokio::time::timeout(Duration::from_secs(2), async {
        while app.auth().is_authenticated() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert!(app.tokens().load().is_none());
    assert!(app.store().state().tasks.is_empty());
}
