//! The interface the core components render through. The concrete
//! terminal implementation (colors, tables, spinners) is an external
//! collaborator — owned by the CLI binary, not this crate — so the Log
//! Engine and Run Orchestrator can be built and tested without a
//! terminal attached.

/// Handle to a single in-progress spinner, returned by [`Sink::spinner`].
/// Long-running operations (the infra poll loop) call `set_message` as
/// their state changes and `finish` once on completion.
pub trait SpinnerHandle: Send + Sync {
    fn set_message(&self, message: &str);
    fn finish(&self, message: &str);
}

/// Minimal rendering surface consumed by the Log Engine and Run
/// Orchestrator. A `String`-returning `Vec<Vec<String>>` table keeps this
/// trait decoupled from any particular table-formatting crate.
pub trait Sink {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn key_value(&self, key: &str, value: &str);
    fn table(&self, headers: &[&str], rows: &[Vec<String>]);
    /// Starts a spinner, already rendered with `message`.
    fn spinner(&self, message: &str) -> Box<dyn SpinnerHandle>;
    /// Prints `label` and reads one line from stdin, trimmed. Used by
    /// `configure` instead of hand-rolled `io::stdin`/`io::stdout` calls.
    fn prompt_line(&self, label: &str) -> std::io::Result<String>;
}

/// A `Sink` that discards everything; useful for tests that only care
/// about the underlying state transitions, not terminal output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

/// A `SpinnerHandle` that discards everything, paired with [`NullSink`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpinnerHandle;

impl SpinnerHandle for NullSpinnerHandle {
    fn set_message(&self, _message: &str) {}
    fn finish(&self, _message: &str) {}
}

impl Sink for NullSink {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn key_value(&self, _key: &str, _value: &str) {}
    fn table(&self, _headers: &[&str], _rows: &[Vec<String>]) {}
    fn spinner(&self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(NullSpinnerHandle)
    }
    fn prompt_line(&self, _label: &str) -> std::io::Result<String> {
        Ok(String::new())
    }
}
