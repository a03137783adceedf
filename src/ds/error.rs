use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassError {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
}

impl ClassError {
    pub fn message(&self) -> &str {
        match self {
            ClassError::ReferenceError(m) => m,
            ClassError::TypeError(m) => m,
            ClassError::RangeError(m) => m,
        }
    }
}
