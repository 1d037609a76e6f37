use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::{AppInfo, UserResponse, ENDPOINT_APP_INFO, ENDPOINT_USER_INFO};
use crate::error::CommonError;

const DEFAULT_BASE_URL: &str = "http://localhost:1135";

#[derive(Clone, Debug)]
pub struct BodhiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as a bearer token on session lookups when present.
    pub api_token: Option<String>,
    pub max_error_body_bytes: usize,
}

impl BodhiClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            api_token: None,
            max_error_body_bytes: 8 * 1024,
        }
    }

    /// Optional:
    /// - `BODHI_URL` (default: "http://localhost:1135")
    /// - `BODHI_TIMEOUT_SECS` (default: 10)
    /// - `BODHI_API_TOKEN`
    /// - `BODHI_MAX_ERROR_BODY_BYTES` (default: 8192)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BODHI_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("BODHI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        let max_error_body_bytes = std::env::var("BODHI_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            api_token: std::env::var("BODHI_API_TOKEN").ok().filter(|t| !t.is_empty()),
            max_error_body_bytes,
        }
    }
}

/// Thin JSON client for the Bodhi server's UI endpoints.
///
/// Failures are returned as-is; callers decide how to surface them. There is no retry loop.
#[derive(Clone)]
pub struct BodhiClient {
    config: BodhiClientConfig,
    http: reqwest::Client,
}

impl BodhiClient {
    pub fn new(config: BodhiClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bodhi-frontend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub async fn app_info(&self) -> Result<AppInfo, CommonError> {
        let url = format!("{}{ENDPOINT_APP_INFO}", self.config.base_url);
        debug!(url, "fetching app info");
        let resp = self
            .http
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await?;
        parse_json_response(resp, self.config.max_error_body_bytes).await
    }

    pub async fn user_info(&self) -> Result<UserResponse, CommonError> {
        let url = format!("{}{ENDPOINT_USER_INFO}", self.config.base_url);
        debug!(url, "fetching user info");
        let mut req = self.http.get(&url).timeout(self.config.timeout);
        if let Some(token) = &self.config.api_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        parse_json_response(resp, self.config.max_error_body_bytes).await
    }
}

async fn parse_json_response<T: for<'de> Deserialize<'de>>(
    resp: reqwest::Response,
    max_error_body_bytes: usize,
) -> Result<T, CommonError> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.bytes().await?;
        return Ok(serde_json::from_slice::<T>(&body)?);
    }
    Err(to_upstream_error(status, resp, max_error_body_bytes).await)
}

async fn to_upstream_error(
    status: StatusCode,
    resp: reqwest::Response,
    max_error_body_bytes: usize,
) -> CommonError {
    let body = read_limited_text(resp, max_error_body_bytes).await;
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(&body) {
        let message = parsed
            .error
            .message
            .unwrap_or_else(|| "unknown server error".to_string());
        return CommonError::Upstream { status, message };
    }
    CommonError::UpstreamBody { status, body }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    let body = match resp.bytes().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to read error body");
            return String::new();
        }
    };
    let end = body.len().min(max_bytes);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Bodhi's error shape, `{"error": {"message", "type", "code", "param"}}`. Only the message is
/// surfaced.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AppStatus, Role};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_app_info() {
        let router = Router::new().route(
            ENDPOINT_APP_INFO,
            get(|| async { Json(json!({"version": "0.0.1", "status": "ready"})) }),
        );
        let base = spawn(router).await;
        let client = BodhiClient::new(BodhiClientConfig::new(&base)).unwrap();

        let info = client.app_info().await.unwrap();
        assert_eq!(info.status, AppStatus::Ready);
        assert_eq!(info.version, "0.0.1");
    }

    #[tokio::test]
    async fn sends_bearer_token_on_user_lookup() {
        let router = Router::new().route(
            ENDPOINT_USER_INFO,
            get(|headers: HeaderMap| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret");
                if authorized {
                    Json(json!({"auth_status": "logged_in", "username": "u", "role": "resource_user"}))
                } else {
                    Json(json!({"auth_status": "logged_out"}))
                }
            }),
        );
        let base = spawn(router).await;
        let mut config = BodhiClientConfig::new(&base);
        config.api_token = Some("secret".to_string());
        let client = BodhiClient::new(config).unwrap();

        match client.user_info().await.unwrap() {
            UserResponse::LoggedIn(info) => assert_eq!(info.role, Some(Role::User)),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_error_envelope_to_upstream_error() {
        let router = Router::new().route(
            ENDPOINT_APP_INFO,
            get(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": {
                            "message": "db down",
                            "type": "internal_server_error",
                            "code": "db_error-connection",
                            "param": null
                        }
                    })),
                )
            }),
        );
        let base = spawn(router).await;
        let client = BodhiClient::new(BodhiClientConfig::new(&base)).unwrap();

        match client.app_info().await {
            Err(CommonError::Upstream { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "db down");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn truncates_non_json_error_body() {
        let router = Router::new().route(
            ENDPOINT_APP_INFO,
            get(|| async { (AxumStatus::BAD_GATEWAY, "x".repeat(64)) }),
        );
        let base = spawn(router).await;
        let mut config = BodhiClientConfig::new(&base);
        config.max_error_body_bytes = 8;
        let client = BodhiClient::new(config).unwrap();

        match client.app_info().await {
            Err(CommonError::UpstreamBody { status, body }) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "xxxxxxxx");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_unknown_status_value() {
        let router = Router::new().route(
            ENDPOINT_APP_INFO,
            get(|| async { Json(json!({"version": "0.0.1", "status": "broken"})) }),
        );
        let base = spawn(router).await;
        let client = BodhiClient::new(BodhiClientConfig::new(&base)).unwrap();

        assert!(matches!(
            client.app_info().await,
            Err(CommonError::InvalidJson(_))
        ));
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = BodhiClientConfig::new("http://localhost:1135/");
        assert_eq!(config.base_url, "http://localhost:1135");
    }
}
