use super::catalog::classify;
use log::Level;

/// Destination for operator-facing diagnostic lines.
pub trait DiagnosticSink {
    fn emit(&self, level: Level, line: &str);
}

/// Forwards diagnostics to the `log` facade under a fixed target.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: String,
}

impl LogSink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("hwdec::videotoolbox")
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&self, level: Level, line: &str) {
        log::log!(target: self.target.as_str(), level, "{}", line);
    }
}

/// `"<message>: <explanation> (<code>)"` for catalogued codes, `"<message>: <code>"` otherwise.
pub fn format_diagnostic(message: &str, code: i32) -> String {
    match classify(code) {
        Some(reason) => format!("{}: {} ({})", message, reason, code),
        None => format!("{}: {}", message, code),
    }
}

pub fn report(sink: &dyn DiagnosticSink, level: Level, message: &str, code: i32) {
    sink.emit(level, &format_diagnostic(message, code));
}
