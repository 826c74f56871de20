// Engine Errors
// Failures that stop a single analysis; snippet and heuristic never produce these

use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    Internal,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("At least 2 documents are required for comparison (got {found})")]
    InsufficientDocuments { found: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Submitted text is too short ({chars} chars, minimum {min})")]
    SubmissionTooShort { chars: usize, min: usize },
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
    #[error("Internal computation error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientDocuments { .. } | Self::InvalidConfig(_) | Self::SubmissionTooShort { .. } => {
                ErrorKind::BadInput
            }
            Self::Io { .. } | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(EngineError::InsufficientDocuments { found: 1 }.kind(), ErrorKind::BadInput);
        assert_eq!(EngineError::Internal("nan".into()).kind(), ErrorKind::Internal);
        let io = EngineError::io("/tmp/x", std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.kind(), ErrorKind::Internal);
        assert!(io.to_string().contains("/tmp/x"));
    }

    #[test]
    fn test_insufficient_message() {
        let e = EngineError::InsufficientDocuments { found: 1 };
        assert!(e.to_string().contains("At least 2 documents"));
    }
}
