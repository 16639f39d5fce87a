//! # API Error Type
//!
//! Unified error type for every `PricingEngine` call.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Folio                                  │
//! │                                                                         │
//! │  Order form / admin panel          PricingEngine                        │
//! │  ────────────────────────          ─────────────                        │
//! │                                                                         │
//! │  calculate_price(request)                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │                                                                  │  │
//! │  │  Storage failed? ─── DbError::Timeout ──────────┐                │  │
//! │  │                                                 │                │  │
//! │  │  Rule violated?  ─── CoreError::Forbidden ──────┴─► ApiError ───►│  │
//! │  │                                                                  │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  switch (e.code) {                                                      │
//! │    case 'FORBIDDEN': highlight(e.field); break;                         │
//! │    case 'STORAGE_ERROR': showRetry(); break;                            │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures never leak driver messages: the detail is logged and the
//! caller gets a generic message.

use folio_core::{CoreError, SelectionField};
use folio_db::DbError;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::ConfigError;

/// Error returned from every engine call.
///
/// ## Serialization
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "binding type 'گالینگور' is not available: ...",
///   "field": "bindingType"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Selection field the error points at, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<SelectionField>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Book size or option is not configured or has no price
    NotConfigured,

    /// Option is configured but disabled by a restriction
    Forbidden,

    /// Quantity or page count outside its constraints
    OutOfRange,

    /// Stored matrix for the book size is unusable
    MalformedMatrix,

    /// Storage unreachable or timed out
    StorageError,

    /// Admin input failed validation
    ValidationError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Points the error at a selection field.
    pub fn with_field(mut self, field: Option<SelectionField>) -> Self {
        self.field = field;
        self
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rejected(core) => ApiError::from(core),
            DbError::MalformedSettings(reason) => {
                tracing::error!(%reason, "Print settings are malformed");
                ApiError::internal("Print settings are malformed")
            }
            DbError::Timeout { operation, after } => {
                tracing::error!(operation, after_ms = after.as_millis() as u64, "Storage timed out");
                ApiError::storage("Storage did not respond in time")
            }
            DbError::ConnectionFailed(_) => ApiError::storage("Storage connection failed"),
            DbError::MigrationFailed(_) => ApiError::storage("Storage migration failed"),
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage query failed: {}", e);
                ApiError::storage("Storage operation failed")
            }
            DbError::PoolExhausted => ApiError::storage("Storage pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal storage error: {}", e);
                ApiError::storage("Storage operation failed")
            }
        }
    }
}

/// Converts rule violations to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let field = err.field();
        let code = match &err {
            CoreError::NotConfigured { .. } => ErrorCode::NotConfigured,
            CoreError::Forbidden { .. } => ErrorCode::Forbidden,
            CoreError::OutOfRange { .. } => ErrorCode::OutOfRange,
            CoreError::MalformedMatrix { .. } => ErrorCode::MalformedMatrix,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string()).with_field(field)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
