use std::path::PathBuf;
use thiserror::Error;

/// Error kinds surfaced by every public operation of the crate.
///
/// # Why structured errors
///
/// Callers (the CLI, a web front end) have to tell a missing file apart from a file that
/// exists but cannot be decoded, and both apart from a bad request argument. Each variant
/// carries just enough context to build a user-facing message without parsing strings.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("No such file: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Cannot read image {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("'{field}' must be a positive value")]
    InvalidDimension { field: &'static str },

    #[error("Initialization error: {operation} failed: {message}")]
    Initialization { operation: String, message: String },

    #[error("Error during prediction: {message}")]
    Prediction { message: String },
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

impl ClassifyError {
    pub(crate) fn initialization(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Initialization {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Returns `true` for the one kind that is never wrapped on its way to the caller.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable name of the error kind, for front ends that map kinds to responses.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Read { .. } => "read",
            Self::InvalidInput { .. } => "invalid_input",
            Self::InvalidDimension { .. } => "invalid_dimension",
            Self::Initialization { .. } => "initialization",
            Self::Prediction { .. } => "prediction",
        }
    }

    /// Client-side errors: the request itself was unusable.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Read { .. }
                | Self::InvalidInput { .. }
                | Self::InvalidDimension { .. }
        )
    }
}

/// Convert image crate errors to read errors.
///
/// Code that knows which file failed should build `ClassifyError::Read` directly with the
/// path; this conversion covers in-memory operations.
impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        Self::Read {
            path: "<memory>".to_string(),
            message: err.to_string(),
        }
    }
}

/// Convert ONNX Runtime errors to prediction errors.
impl From<ort::Error> for ClassifyError {
    fn from(err: ort::Error) -> Self {
        Self::Prediction {
            message: err.to_string(),
        }
    }
}

/// Convert ndarray shape errors to prediction errors.
///
/// Shape errors only show up while reading model outputs, so they belong with inference
/// failures rather than in a separate tensor category.
impl From<ndarray::ShapeError> for ClassifyError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Prediction {
            message: format!("tensor shape conversion: {err}"),
        }
    }
}
