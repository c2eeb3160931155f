use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for diagnosing a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Relative endpoint path or WebSocket command that produced the error
    pub endpoint: Option<String>,
    /// HTTP status code, when the failure came from an HTTP response
    pub status_code: Option<u16>,
    /// Additional detail (e.g. the server-provided message key)
    pub details: Option<String>,
    /// Component that raised the error (e.g. "http", "session", "chat1")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Coarse error taxonomy, independent of how the failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    Server,
    Filtered,
    NotFound,
    MalformedResponse,
    Overloaded,
    InvalidArgument,
    Configuration,
    Timeout,
    Transport,
    Io,
}

/// Unified error type for every client call.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication failed: {message}{}", format_context(.context))]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Server error: {message}{}", format_context(.context))]
    Server {
        message: String,
        context: ErrorContext,
    },

    #[error("Response was filtered by the service{}", format_context(.context))]
    Filtered { context: ErrorContext },

    #[error("Not found: {message}{}", format_context(.context))]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// The body could not be decoded; `body` holds the raw payload for diagnosis.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, body: String },

    #[error("Service overloaded: {message}{}", format_context(.context))]
    Overloaded {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Timed out: {message}")]
    Timeout { message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref endpoint) = ctx.endpoint {
        parts.push(format!("endpoint: {}", endpoint));
    }
    if let Some(status) = ctx.status_code {
        parts.push(format!("status: {}", status));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn authentication(msg: impl Into<String>) -> Self {
        Error::Authentication {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn server(msg: impl Into<String>) -> Self {
        Error::Server {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn filtered() -> Self {
        Error::Filtered {
            context: ErrorContext::new(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn overloaded(msg: impl Into<String>) -> Self {
        Error::Overloaded {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn malformed(msg: impl Into<String>, body: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
            body: body.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: msg.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout {
            message: msg.into(),
        }
    }

    /// Attach (or replace) structured context. Variants without a context slot are
    /// returned unchanged.
    pub fn with_context(mut self, new: ErrorContext) -> Self {
        match &mut self {
            Error::Authentication { context, .. }
            | Error::Server { context, .. }
            | Error::Filtered { context }
            | Error::NotFound { context, .. }
            | Error::Overloaded { context, .. } => *context = new,
            _ => {}
        }
        self
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Authentication { context, .. }
            | Error::Server { context, .. }
            | Error::Filtered { context }
            | Error::NotFound { context, .. }
            | Error::Overloaded { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Server { .. } => ErrorKind::Server,
            Error::Filtered { .. } => ErrorKind::Filtered,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::Overloaded { .. } => ErrorKind::Overloaded,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Message carried by the service for server/auth/not-found errors.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Authentication { message, .. }
            | Error::Server { message, .. }
            | Error::NotFound { message, .. }
            | Error::Overloaded { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedResponse {
            message: e.to_string(),
            body: String::new(),
        }
    }
}
