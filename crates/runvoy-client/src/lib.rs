//! Typed REST client for the runvoy control-plane API (§4.C).
//!
//! One method per server capability, bearer-token authenticated, with a
//! per-call deadline and structured error mapping. Grounded on
//! `faas-sdk::FaasClient`: a single shared `reqwest::Client`, a thin
//! per-call error-mapping pattern, and plain async methods returning
//! typed responses.

pub mod error;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use runvoy_core::{
    CreateSecretRequest, CreateUserResult, Execution, ExecutionEnvelope, ExecutionRequest,
    ExecutionStatus, HealthReport, HealthStatus, ImageActionResult, ImageInfo, KillResult,
    LogsResponse, RegisterImageRequest, SecretActionResult, SecretInfo, TraceResponse,
    UpdateSecretRequest, User, UserRole,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

pub use error::{ClientError, Result};

/// Default per-call deadline, per §4.C ("each call carries a per-call
/// deadline (default 60s)").
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Typed client for the runvoy control-plane REST API.
#[derive(Clone)]
pub struct RunvoyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    call_timeout: Duration,
}

impl RunvoyClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
    }

    /// Sends a request, enforces the per-call deadline, and maps the
    /// response to a typed value or a structured [`ClientError`].
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = tokio::time::timeout(self.call_timeout, req.send())
            .await
            .map_err(|_| ClientError::Timeout(self.call_timeout))??;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(body));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized);
        }

        // Response bodies include a server-reported `error` field for
        // 2xx-with-business-error patterns; a non-empty `error` field
        // triggers error mapping even on a 2xx status.
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
                if !message.is_empty() {
                    return Err(ClientError::Remote(message.to_string()));
                }
            }
        }

        if !status.is_success() {
            return Err(ClientError::Remote(format!("{status}: {body}")));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.authed(Method::GET, path)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.authed(Method::POST, path).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.authed(Method::POST, path)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.authed(Method::PUT, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.authed(Method::DELETE, path)).await
    }

    #[instrument(skip(self))]
    pub async fn claim_api_key(&self, token: &str) -> Result<runvoy_core::ClaimApiKeyResult> {
        self.post(&format!("/v1/claim/{token}"), &serde_json::json!({})).await
    }

    #[instrument(skip(self, request))]
    pub async fn run_command(&self, request: &ExecutionRequest) -> Result<ExecutionEnvelope> {
        self.post("/v1/executions", request).await
    }

    #[instrument(skip(self))]
    pub async fn get_execution_status(&self, id: &str) -> Result<ExecutionStatus> {
        #[derive(serde::Deserialize)]
        struct StatusResponse {
            status: ExecutionStatus,
        }
        let resp: StatusResponse = self.get(&format!("/v1/executions/{id}/status")).await?;
        Ok(resp.status)
    }

    /// Idempotent: killing an already-terminated execution returns an
    /// empty envelope from the server (rendered here as `null`), which is
    /// surfaced as [`KillResult::was_already_terminated`] rather than an
    /// error.
    #[instrument(skip(self))]
    pub async fn kill_execution(&self, id: &str) -> Result<KillResult> {
        let req = self.authed(Method::POST, &format!("/v1/executions/{id}/kill"));
        let response = tokio::time::timeout(self.call_timeout, req.send())
            .await
            .map_err(|_| ClientError::Timeout(self.call_timeout))??;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ClientError::Remote(format!("{status}: {body}")));
        }

        let parsed: Option<KillResult> = serde_json::from_str(&body)?;
        Ok(parsed.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn get_logs(&self, id: &str) -> Result<LogsResponse> {
        self.get(&format!("/v1/executions/{id}/logs")).await
    }

    #[instrument(skip(self))]
    pub async fn list_executions(&self) -> Result<Vec<Execution>> {
        self.get("/v1/executions").await
    }

    #[instrument(skip(self))]
    pub async fn register_image(
        &self,
        image_ref: &str,
        default: Option<bool>,
    ) -> Result<ImageActionResult> {
        let req = RegisterImageRequest { image_ref: image_ref.to_string(), default };
        self.post("/v1/images", &req).await
    }

    #[instrument(skip(self))]
    pub async fn list_images(&self) -> Result<Vec<ImageInfo>> {
        self.get("/v1/images").await
    }

    #[instrument(skip(self))]
    pub async fn unregister_image(&self, image_ref: &str) -> Result<ImageActionResult> {
        self.delete(&format!("/v1/images/{}", urlencoding_path(image_ref))).await
    }

    #[instrument(skip(self, req))]
    pub async fn create_secret(&self, req: &CreateSecretRequest) -> Result<SecretActionResult> {
        self.post("/v1/secrets", req).await
    }

    #[instrument(skip(self))]
    pub async fn get_secret(&self, name: &str) -> Result<SecretInfo> {
        self.get(&format!("/v1/secrets/{name}")).await
    }

    #[instrument(skip(self))]
    pub async fn list_secrets(&self) -> Result<Vec<SecretInfo>> {
        self.get("/v1/secrets").await
    }

    #[instrument(skip(self, req))]
    pub async fn update_secret(
        &self,
        name: &str,
        req: &UpdateSecretRequest,
    ) -> Result<SecretActionResult> {
        self.put(&format!("/v1/secrets/{name}"), req).await
    }

    #[instrument(skip(self))]
    pub async fn delete_secret(&self, name: &str) -> Result<SecretActionResult> {
        self.delete(&format!("/v1/secrets/{name}")).await
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, email: &str, role: UserRole) -> Result<CreateUserResult> {
        self.post("/v1/users", &serde_json::json!({ "email": email, "role": role })).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/v1/users").await
    }

    #[instrument(skip(self))]
    pub async fn revoke_user(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self.delete(&format!("/v1/users/{}", urlencoding_path(email))).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reconcile_health(&self) -> Result<HealthReport> {
        self.post_empty("/v1/health/reconcile").await
    }

    #[instrument(skip(self))]
    pub async fn fetch_backend_logs(&self, request_id: &str) -> Result<TraceResponse> {
        self.get(&format!("/v1/trace/{request_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn get_health(&self) -> Result<HealthStatus> {
        self.get("/v1/health").await
    }
}

/// Minimal path-segment escaping for identifiers embedded in a URL.
/// Control-plane identifiers are opaque tokens/emails; this covers the
/// characters most likely to appear (`@`, `/`).
fn urlencoding_path(segment: &str) -> String {
    segment.replace('%', "%25").replace('@', "%40").replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use runvoy_core::ExecutionStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RunvoyClient {
        RunvoyClient::new(server.uri(), "test-key")
    }

    #[tokio::test]
    async fn run_command_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/executions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "execution_id": "exec-1",
                "status": "STARTING",
                "image_id": "alpine:latest",
                "websocket_url": "wss://example/ws"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let req = ExecutionRequest { command: "echo hi".into(), ..Default::default() };
        let env = client.run_command(&req).await.unwrap();
        assert_eq!(env.execution_id, "exec-1");
        assert_eq!(env.status, ExecutionStatus::Starting);
    }

    #[tokio::test]
    async fn maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/executions/missing/logs"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such execution"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_logs("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn maps_401_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/executions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_executions().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[tokio::test]
    async fn maps_2xx_with_error_field_to_remote() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/executions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "quota exceeded"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let req = ExecutionRequest { command: "echo hi".into(), ..Default::default() };
        let err = client.run_command(&req).await.unwrap_err();
        match err {
            ClientError::Remote(msg) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn kill_already_terminated_surfaces_as_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/executions/exec-1/kill"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(null)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.kill_execution("exec-1").await.unwrap();
        assert!(result.was_already_terminated());
    }
}
