use reqwest::StatusCode;
use std::fmt;

/// Errors raised by the KYC client.
#[derive(Debug)]
pub enum KycError {
    /// Request rejected locally before any network call.
    Validation(String),
    /// Upload source file does not exist.
    NotFound(String),
    /// Upload source file exists but cannot be read.
    PermissionDenied(String),
    /// Connection failure, timeout or other transport-level error.
    Transport(reqwest::Error),
    /// The API answered with a non-success status.
    Http {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// Response body, as text.
        body: String,
    },
    /// The response body was not a JSON object.
    InvalidResponse(String),
    /// Local IO failure while preparing a request.
    Io(std::io::Error),
    /// Error with an operation prefix attached.
    WithContext {
        /// The underlying source of the error.
        source: Box<KycError>,
        /// Additional context message.
        context: String,
    },
}

impl KycError {
    /// Numeric code propagated from the transport, when one exists.
    ///
    /// For HTTP failures this is the response status. Validation errors never
    /// carry a code.
    pub fn code(&self) -> Option<u16> {
        match self {
            KycError::Http { status, .. } => Some(status.as_u16()),
            KycError::Transport(e) => e.status().map(|s| s.as_u16()),
            KycError::WithContext { source, .. } => source.code(),
            _ => None,
        }
    }

    /// Whether this error was produced by local pre-flight validation.
    pub fn is_validation(&self) -> bool {
        match self {
            KycError::Validation(_) | KycError::NotFound(_) | KycError::PermissionDenied(_) => {
                true
            }
            KycError::WithContext { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

impl fmt::Display for KycError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KycError::Validation(msg) => write!(f, "{}", msg),
            KycError::NotFound(msg) => write!(f, "{}", msg),
            KycError::PermissionDenied(msg) => write!(f, "{}", msg),
            KycError::Transport(e) => write!(f, "{}", e),
            KycError::Http { status, body } => {
                if body.is_empty() {
                    write!(f, "API returned {}", status)
                } else {
                    write!(f, "API returned {}: {}", status, body)
                }
            }
            KycError::InvalidResponse(msg) => write!(f, "Invalid response from API: {}", msg),
            KycError::Io(e) => write!(f, "IO error: {}", e),
            KycError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for KycError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KycError::Transport(e) => Some(e),
            KycError::Io(e) => Some(e),
            KycError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for KycError {
    fn from(err: reqwest::Error) -> Self {
        KycError::Transport(err)
    }
}

impl From<std::io::Error> for KycError {
    fn from(err: std::io::Error) -> Self {
        KycError::Io(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `KycError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, KycError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, KycError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, KycError> {
    fn context(self, context: impl Into<String>) -> Result<T, KycError> {
        self.map_err(|e| KycError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, KycError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| KycError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, reqwest::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, KycError> {
        self.map_err(|e| KycError::WithContext {
            source: Box::new(KycError::Transport(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, KycError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| KycError::WithContext {
            source: Box::new(KycError::Transport(e)),
            context: f(),
        })
    }
}
