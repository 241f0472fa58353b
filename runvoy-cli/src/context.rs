use std::path::PathBuf;
use std::sync::Arc;

use runvoy_client::RunvoyClient;
use runvoy_config::{Config, ConfigStore};
use runvoy_core::Sink;

use crate::error::Result;
use crate::output::TerminalSink;

/// Built fresh by `main()` for each invocation — no global mutable
/// singleton. Bundles the HTTP Client, the loaded Config, the Config
/// Store handle (so subcommands can persist changes), and the Output
/// Sink.
pub struct AppContext {
    pub client: RunvoyClient,
    pub config: Config,
    pub config_store: ConfigStore,
    pub sink: Arc<dyn Sink + Send + Sync>,
    pub playbook_dir: PathBuf,
}

impl AppContext {
    /// Builds a fresh context using `runvoy-client`'s own per-call deadline
    /// (`DEFAULT_CALL_TIMEOUT`, 60s). The subcommand-level `--timeout` is a
    /// separate, longer-lived bound applied by the caller around the whole
    /// dispatch, not around individual HTTP calls.
    pub fn build() -> Result<Self> {
        let config_store = ConfigStore::discover()?;
        let config = config_store.load()?;
        let sink: Arc<dyn Sink + Send + Sync> = Arc::new(TerminalSink::new());

        let api_endpoint = config.api_endpoint.clone().unwrap_or_default();
        let api_key = config.api_key.clone().unwrap_or_default();
        let client = RunvoyClient::new(api_endpoint, api_key);

        let playbook_dir = match std::env::var("RUNVOY_PLAYBOOK_DIR") {
            Ok(p) => PathBuf::from(p),
            Err(_) => dirs::config_dir()
                .map(|d| d.join("runvoy").join("playbooks"))
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        Ok(Self { client, config, config_store, sink, playbook_dir })
    }

    pub fn web_url(&self) -> String {
        self.config.web_url.clone().unwrap_or_default()
    }
}
