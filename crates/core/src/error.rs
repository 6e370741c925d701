use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinanceError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl FinanceError {
    /// Client errors are the caller's fault and are never worth retrying.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FinanceError::Storage(_))
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;
