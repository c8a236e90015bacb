use thiserror::Error;

/// Failure of a single item. Every variant is item-local; whether it aborts the
/// batch is decided by the caller's continue-on-fail setting alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdcError {
    #[error("the operation \"{operation}\" is not supported for resource \"{resource}\"")]
    UnsupportedOperation { resource: String, operation: String },
    #[error("{0}")]
    MissingBinaryData(String),
    #[error("malformed binary data: {0}")]
    MalformedBinaryData(String),
    #[error("{}", remote_message(.status, .message))]
    RemoteApiError {
        status: Option<u16>,
        message: String,
    },
    #[error("invalid parameter \"{name}\": {message}")]
    InvalidParameter { name: String, message: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl AdcError {
    pub fn unsupported(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteApiError {
            status,
            message: message.into(),
        }
    }

    /// Machine-readable error kind, used in event payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::MissingBinaryData(_) => "missing_binary_data",
            Self::MalformedBinaryData(_) => "malformed_binary_data",
            Self::RemoteApiError { .. } => "remote_api",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::UnexpectedResponse(_) => "unexpected_response",
        }
    }
}

fn remote_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(s) => format!("remote API error (status {s}): {message}"),
        None => format!("remote API error: {message}"),
    }
}
