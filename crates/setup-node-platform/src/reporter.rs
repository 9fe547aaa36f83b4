use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use setup_node_backend::LogSink;

/// Writes build output as runner workflow commands.
pub struct WorkflowLog<W> {
    writer: Mutex<W>,
}

impl WorkflowLog<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WorkflowLog<Vec<u8>> {
    #[must_use]
    pub fn buffered() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn captured(&self) -> String {
        let guard = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl<W: Write> WorkflowLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn line(&self, line: &str) {
        let mut guard = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = writeln!(guard, "{line}");
        let _ = guard.flush();
    }
}

pub(crate) fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub(crate) fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

impl<W: Write + Send> LogSink for WorkflowLog<W> {
    fn info(&self, message: &str) {
        self.line(message);
    }

    fn warning(&self, message: &str) {
        self.line(&format!("::warning::{}", escape_data(message)));
    }

    fn error(&self, message: &str) {
        self.line(&format!("::error::{}", escape_data(message)));
    }

    fn start_group(&self, name: &str) {
        self.line(&format!("::group::{}", escape_data(name)));
    }

    fn end_group(&self) {
        self.line("::endgroup::");
    }

    fn add_matcher(&self, path: &Path) {
        self.line(&format!("##[add-matcher]{}", path.display()));
    }
}
