use std::io::{self, Write};

use runvoy_config::{Config, ConfigStore};

use crate::error::Result;
use crate::output::TerminalSink;
use runvoy_core::Sink;

fn prompt(sink: &dyn Sink, label: &str, current: &str) -> io::Result<String> {
    let full_label = if current.is_empty() { label.to_string() } else { format!("{label} [{current}]") };
    let entered = sink.prompt_line(&full_label)?;
    Ok(if entered.is_empty() { current.to_string() } else { entered })
}

/// Interactively prompts for each Config field and writes the result
/// through the Config Store. The API key is read without echo.
pub fn configure() -> Result<()> {
    let store = ConfigStore::discover()?;
    let existing = store.load()?;
    let sink = TerminalSink::new();

    let api_endpoint = prompt(&sink, "API endpoint", existing.api_endpoint.as_deref().unwrap_or(""))?;
    let web_url = prompt(&sink, "Web URL", existing.web_url.as_deref().unwrap_or(""))?;
    let provider = prompt(&sink, "Provider", &existing.provider)?;

    print!("API key [unchanged]: ");
    io::stdout().flush()?;
    let entered_key = rpassword::read_password().unwrap_or_default();
    let api_key = if entered_key.is_empty() { existing.api_key } else { Some(entered_key) };

    let config = Config {
        api_endpoint: non_empty(api_endpoint),
        api_key,
        web_url: non_empty(web_url),
        provider,
        default_stack: existing.default_stack,
    };
    store.save(&config)?;

    sink.success(&format!("config saved to {}", store.path().display()));
    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
