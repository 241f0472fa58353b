//! The Log Engine: a status-aware reader that picks between a one-shot
//! static render and a live websocket stream, and never mixes the two for
//! a single execution.

mod error;
mod render;
mod stream;

use std::sync::Arc;

use runvoy_client::RunvoyClient;
use runvoy_core::Sink;

pub use error::{LogEngineError, Result};
pub use render::{format_timestamp, order_for_static_render, static_render};
pub use stream::stream;

/// `DisplayLogs(execution_id, web_url)`: fetches logs once, then commits to
/// either `StaticRender` (terminal status at observation time) or `Stream`
/// (non-terminal status with a live `websocket_url`). A non-terminal
/// status with no `websocket_url` is a protocol error.
pub async fn display_logs(
    client: &RunvoyClient,
    sink: Arc<dyn Sink + Send + Sync>,
    execution_id: &str,
    web_url: &str,
) -> Result<()> {
    let response = client.get_logs(execution_id).await?;

    if response.status.is_terminal() {
        static_render(sink.as_ref(), &response.events, response.status);
        return Ok(());
    }

    let ws_url = response
        .websocket_url
        .as_deref()
        .ok_or(LogEngineError::MissingWebsocketUrl)?;

    let viewer_url = format!("{}/executions/{}/logs", web_url.trim_end_matches('/'), execution_id);
    sink.info(&format!("streaming logs — view in browser: {viewer_url}"));

    stream::stream(ws_url, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use runvoy_core::NullSink;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn terminal_status_renders_statically_without_dialing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/executions/exec-1/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "execution_id": "exec-1",
                "events": [{"timestamp": 1, "message": "a"}],
                "status": "SUCCEEDED",
            })))
            .mount(&server)
            .await;

        let client = RunvoyClient::new(server.uri(), "token");
        let sink: Arc<dyn Sink + Send + Sync> = Arc::new(NullSink);
        let result = display_logs(&client, sink, "exec-1", "https://web.example").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_terminal_without_websocket_url_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/executions/exec-2/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "execution_id": "exec-2",
                "events": [],
                "status": "RUNNING",
            })))
            .mount(&server)
            .await;

        let client = RunvoyClient::new(server.uri(), "token");
        let sink: Arc<dyn Sink + Send + Sync> = Arc::new(NullSink);
        let result = display_logs(&client, sink, "exec-2", "https://web.example").await;
        assert!(matches!(result, Err(LogEngineError::MissingWebsocketUrl)));
    }
}
