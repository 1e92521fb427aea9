//! Error types for backend fetches and dashboard operations.
//!
//! Every backend operation resolves to a [`FetchOutcome`]: either the decoded
//! payload or a [`FetchError`] tagged with an [`ErrorKind`]. Transport and
//! decoding failures never escape the client as raw errors, so the
//! orchestrator only ever has to map a kind to a visible message.

use std::fmt;

/// Normalized result of every backend operation.
pub type FetchOutcome<T> = Result<T, FetchError>;

/// Result type for non-fetch dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, non-2xx without an error body, or malformed payload.
    Transport,
    /// The backend answered with an `error` field.
    BackendReported,
    /// Fewer recent samples than the prediction window requires.
    InsufficientData,
    /// The trend endpoint succeeded but returned no daily entries.
    EmptyTrend,
    /// The request exceeded the configured timeout.
    Timeout,
}

impl ErrorKind {
    /// Stable lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::BackendReported => "backend_reported",
            ErrorKind::InsufficientData => "insufficient_data",
            ErrorKind::EmptyTrend => "empty_trend",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured context for fetch errors.
///
/// Only used for logging; the user-facing text is [`FetchError::user_message`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "predict", "get_trend")
    pub operation: Option<String>,
    /// Endpoint path or URL involved
    pub endpoint: Option<String>,
    /// HTTP status code if a response was received
    pub status: Option<u16>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref endpoint) = self.endpoint {
            parts.push(format!("endpoint={}", endpoint));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={}", status));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// A normalized backend failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} error: {message} {context}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an error carrying the backend's own `error` text.
    pub fn backend_reported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendReported, message)
    }

    /// Create an insufficient-data error for `got` samples out of `needed`.
    pub fn insufficient_data(needed: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::InsufficientData,
            format!("Not enough data for prediction. Need {}, got {}.", needed, got),
        )
    }

    /// Create an empty-trend error.
    pub fn empty_trend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyTrend, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Replace the error context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Short text shown in the classification stat card.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::BackendReported => self.message.clone(),
            ErrorKind::Transport => "Network Error".to_string(),
            ErrorKind::InsufficientData => "Error: Not enough data from server.".to_string(),
            ErrorKind::EmptyTrend => "No Data".to_string(),
            ErrorKind::Timeout => "Request timed out".to_string(),
        }
    }
}

/// Errors raised outside the fetch path.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The requested horizon id is not in the catalog.
    #[error("Unknown horizon: {0}")]
    UnknownHorizon(String),

    /// The horizon exists but has no trend window (short-term).
    #[error("Horizon {0} has no trend window")]
    NotLongTerm(String),

    /// A computed calendar date fell outside the supported range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// The catalog definition violates an invariant.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The theme preference could not be persisted.
    #[error("Theme storage error: {0}")]
    ThemeStorage(String),
}
