use thiserror::Error;

/// Structured error context for argument and configuration failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "size", "BATCH_AWAIT_STRATEGY")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Operation that raised the error (e.g., "chunk", "run_bounded")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
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

/// Errors surfaced to the caller of the chunker and the executors.
///
/// Work item failures never appear here; they are routed to an
/// [`ErrorSink`](crate::batch::ErrorSink) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {message}{}", format_context(.context))]
    InvalidArgument {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

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
    pub fn invalid_argument(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidArgument {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Rejects a non-positive group or concurrency size.
    pub(crate) fn check_size(size: usize, source: &str) -> crate::Result<()> {
        if size == 0 {
            return Err(Error::invalid_argument(
                "size must be greater than zero",
                ErrorContext::new()
                    .with_field_path("size")
                    .with_details("0")
                    .with_source(source),
            ));
        }
        Ok(())
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Error::InvalidArgument { context, .. } | Error::Configuration { context, .. } => {
                context
            }
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}
