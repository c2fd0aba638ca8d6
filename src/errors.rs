use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation of snapshots and reports
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fatal analysis errors (malformed envelope, unknown operation type)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Account data retrieval outside of an analysis run
    #[error("Account fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Base64 decoding
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// User-supplied input that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors that abort an analysis run.
///
/// Per-account and per-signature problems never show up here; they are
/// collected into the result instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The envelope could not be decoded as either a fee-bump or a plain transaction
    #[error("Malformed envelope: {reason}")]
    MalformedEnvelope { reason: String },

    /// An operation type outside the classifier's closed set
    #[error("Unknown operation type '{operation_type}' at operation {index}")]
    UnknownOperationType { index: usize, operation_type: String },

    /// The caller's cancellation signal fired before the run completed
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Operation type with no threshold tier
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No threshold tier for operation type '{0}'")]
pub struct UnknownOperationType(pub crate::types::OperationType);

/// Account data provider errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The account does not exist on the ledger
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    /// Transport-level failure talking to the provider
    #[error("Network error: {message}")]
    Network { message: String },

    /// Request timed out
    #[error("Request timeout: {timeout_seconds}s for {account_id}")]
    Timeout {
        timeout_seconds: u64,
        account_id: String,
    },

    /// Retry limit exceeded
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// Provider returned something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Whether the failure means the account is absent rather than unreachable
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::AccountNotFound { .. })
    }
}

/// Signature verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Key is not a decodable ed25519 public key
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// Signature is not the fixed 64-byte length
    #[error("Malformed signature: expected 64 bytes, got {length}")]
    MalformedSignature { length: usize },
}

/// Envelope parser errors
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("XDR decoding error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    #[error("Envelope is not a fee-bump envelope")]
    NotFeeBump,

    #[error("Fee-bump envelope where a plain transaction was expected")]
    UnexpectedFeeBump,

    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),
}

impl From<EnvelopeError> for AnalysisError {
    fn from(err: EnvelopeError) -> Self {
        AnalysisError::MalformedEnvelope {
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for account data provider operations
pub type FetchResult<T> = Result<T, FetchError>;
