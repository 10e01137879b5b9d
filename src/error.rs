use thiserror::Error;

/// A field-scoped validation failure raised while building an order.
///
/// `field` is the wire name of the offending field so callers can map it back
/// to whatever form or file produced the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transport error calling {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },
    #[error("gateway rejected {endpoint} with status {status}: {message}")]
    RemoteRejection {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("signing error: {0}")]
    Signing(String),
    #[error("order already submitted with id {0}")]
    AlreadySubmitted(u64),
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),
    #[error("bank code registry already installed")]
    RegistryAlreadyInstalled,
    #[error("invalid bank code registry: {0}")]
    InvalidRegistry(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrderError>;
