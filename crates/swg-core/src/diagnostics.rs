use std::fmt;

use serde::Serialize;

/// How serious a per-entry problem is. None of them abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A problem found while normalizing one entry of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The definition key or `METHOD url` the problem belongs to.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Ordered list of diagnostics. Every diagnostic is also emitted through `log`
/// at the matching level when it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Info, subject.into(), message.into());
    }

    pub fn warn(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Warning, subject.into(), message.into());
    }

    pub fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Error, subject.into(), message.into());
    }

    fn record(&mut self, severity: Severity, subject: String, message: String) {
        let diagnostic = Diagnostic {
            severity,
            subject,
            message,
        };
        match severity {
            Severity::Info => log::info!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    /// Whether any diagnostic's subject contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.items.iter().any(|d| d.subject.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The output of a resolver together with what it had to skip.
#[derive(Debug, Clone, Default)]
pub struct Resolved<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Resolved<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }
}
