use std::io::{self, Write};

use runvoy_core::{Sink, SpinnerHandle};
use tabled::builder::Builder;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// The terminal implementation of the Output Sink: colorized info/
/// success/warning/error lines, key/value pairs, tables, a spinner, and
/// a stdin line prompt.
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }

    fn write_line(&self, stream: &mut StandardStream, color: Option<Color>, message: &str) {
        if let Some(color) = color {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(color)).set_bold(true);
            let _ = stream.set_color(&spec);
        }
        let _ = writeln!(stream, "{message}");
        let _ = stream.reset();
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TerminalSink {
    fn info(&self, message: &str) {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        self.write_line(&mut stream, None, message);
    }

    fn success(&self, message: &str) {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        self.write_line(&mut stream, Some(Color::Green), message);
    }

    fn warning(&self, message: &str) {
        let mut stream = StandardStream::stderr(ColorChoice::Auto);
        self.write_line(&mut stream, Some(Color::Yellow), &format!("warning: {message}"));
    }

    fn error(&self, message: &str) {
        let mut stream = StandardStream::stderr(ColorChoice::Auto);
        self.write_line(&mut stream, Some(Color::Red), &format!("error: {message}"));
    }

    fn key_value(&self, key: &str, value: &str) {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        let _ = stream.set_color(&spec);
        let _ = write!(stream, "{key}:");
        let _ = stream.reset();
        let _ = writeln!(stream, " {value}");
    }

    fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row.clone());
        }
        println!("{}", builder.build());
    }

    fn spinner(&self, message: &str) -> Box<dyn SpinnerHandle> {
        print!("{message}");
        let _ = io::stdout().flush();
        Box::new(TerminalSpinner)
    }

    fn prompt_line(&self, label: &str) -> io::Result<String> {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// No animation thread — each update overwrites the current terminal line
/// with `\r`, matching the rest of this sink's print-and-flush style.
struct TerminalSpinner;

impl SpinnerHandle for TerminalSpinner {
    fn set_message(&self, message: &str) {
        print!("\r{message}\x1b[K");
        let _ = io::stdout().flush();
    }

    fn finish(&self, message: &str) {
        println!("\r{message}\x1b[K");
    }
}
