use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "disclaimer_line", "audio_sources[1]")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected value, HTTP body excerpt)
    pub details: Option<String>,
    /// Source of the error (e.g., "config", "stt", "http_agent")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
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

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the screening pipeline.
///
/// Only [`Error::Configuration`] ever escapes [`crate::pipeline::Orchestrator::run`];
/// source and generation failures are recovered inside the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Audio source unavailable: {source_id}: {message}")]
    SourceUnavailable { source_id: String, message: String },

    #[error("Generation error: {message}{}", format_context(.context))]
    Generation {
        message: String,
        retryable: bool,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
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
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn source_unavailable(source_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            source_id: source_id.into(),
            message: msg.into(),
        }
    }

    /// A transient generation failure (rate limit, timeout, 5xx).
    pub fn transient(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Generation {
            message: msg.into(),
            retryable: true,
            context,
        }
    }

    /// A generation failure that will not improve on retry (bad request, auth).
    pub fn permanent(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Generation {
            message: msg.into(),
            retryable: false,
            context,
        }
    }

    /// Whether another attempt at the same unit of work could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Generation { retryable, .. } => *retryable,
            Error::Transport(e) => !e.is_builder(),
            _ => false,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Generation { context, .. }
            | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}
