use thiserror::Error;

/// Errors surfaced by every vendor-neutral service.
///
/// Callers are expected to match on the variant: [`ScmError::NotSupported`]
/// is a permanent capability gap for the selected driver, while
/// [`ScmError::Network`] or [`ScmError::Status`] may succeed on a later try.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The driver's vendor API does not expose this operation.
    #[error("Not supported")]
    NotSupported,

    /// The vendor accepted the request but reported a business error.
    #[error("API error: {message}")]
    Api { message: String },

    /// The vendor answered with a failing HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Resource not found (org, repo, etc.).
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Network or connection error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Caller input was rejected before any request was sent.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Webhook token did not match the configured secret.
    #[error("Invalid webhook signature")]
    SignatureInvalid,

    /// Webhook event is not one the driver understands.
    #[error("Unknown webhook event: {event}")]
    UnknownWebhook { event: String },

    /// Webhook body exceeded the read limit.
    #[error("Webhook payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Unexpected/internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create an API error.
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a network error.
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an input validation error.
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an unknown webhook error.
    #[inline]
    pub fn unknown_webhook(event: impl Into<String>) -> Self {
        Self::UnknownWebhook {
            event: event.into(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if the operation can never succeed against this driver.
    #[inline]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported)
    }

    /// HTTP status associated with the error, if any.
    ///
    /// A repository lookup that finds no match reports 404 even though the
    /// vendor itself answered 200.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which is useful for errors
/// that include backtraces or multi-line details.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, ScmError>;
