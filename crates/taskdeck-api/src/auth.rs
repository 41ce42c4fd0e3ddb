//! Token endpoints.

use async_trait::async_trait;
use taskdeck_auth::{AuthApi, LoginResponse, RefreshResponse};
use taskdeck_core::ApiError;
use taskdeck_settings::ApiSettings;

use crate::transport::{Transport, decode};

/// [`AuthApi`] over HTTP. Requests carry no bearer token.
pub struct HttpAuthApi {
    transport: Transport,
}

impl HttpAuthApi {
    /// Client for the configured service.
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            transport: Transport::new(settings),
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response, ApiError> {
        let request = self
            .transport
            .client()
            .post(self.transport.url(path))
            .json(&body);
        self.transport.execute(request).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[tracing::instrument(skip_all)]
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        decode(self.post("/token/", body).await?).await
    }

    async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let _ = self
            .post("/token/verify/", serde_json::json!({ "token": token }))
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let body = serde_json::json!({ "refresh": refresh_token });
        decode(self.post("/token/refresh/", body).await?).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskdeck_core::ErrorKind;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> HttpAuthApi {
        HttpAuthApi::new(&ApiSettings {
            base_url: server.uri(),
            ..ApiSettings::default()
        })
    }

    #[tokio::test]
    async fn login_exchanges_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .and(body_json(json!({"username": "ana", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "a1",
                "refresh": "r1",
                "user": {"id": 1, "username": "ana", "email": "ana@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server).login("ana", "secret").await.unwrap();
        assert_eq!(resp.access, "a1");
        assert_eq!(resp.refresh, "r1");
        assert_eq!(resp.user.unwrap().username, "ana");
    }

    #[tokio::test]
    async fn login_rejected_carries_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "No active account found with the given credentials"
            })))
            .mount(&server)
            .await;

        let err = client(&server).login("ana", "wrong").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(
            err.message(),
            "No active account found with the given credentials"
        );
    }

    #[tokio::test]
    async fn verify_token_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/verify/"))
            .and(body_json(json!({"token": "good"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/verify/"))
            .and(body_json(json!({"token": "stale"})))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Token is invalid or expired"
            })))
            .mount(&server)
            .await;

        let api = client(&server);
        assert!(api.verify_token("good").await.is_ok());
        assert!(api.verify_token("stale").await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn refresh_posts_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/refresh/"))
            .and(body_json(json!({"refresh": "r1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a2"})))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server).refresh("r1").await.unwrap();
        assert_eq!(resp.access, "a2");
        assert!(resp.refresh.is_none());
    }
}
