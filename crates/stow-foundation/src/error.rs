//! Error handling for placement and the refactor actions built on it

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type used throughout stow
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StowError {
    /// The target path lies outside every declared source root
    #[error("Can't find '{target}' among roots")]
    NoContainingRoot { target: String },

    /// A path segment that must be a directory exists as something else
    #[error("Expected directory, found file at {path}")]
    PathConflict { path: PathBuf },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file {path}: {source}")]
    FileCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        line: Option<usize>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl StowError {
    /// Create a no-containing-root error
    pub fn no_containing_root(target: impl Into<String>) -> Self {
        Self::NoContainingRoot {
            target: target.into(),
        }
    }

    /// Create a path conflict error
    pub fn path_conflict(path: impl Into<PathBuf>) -> Self {
        Self::PathConflict { path: path.into() }
    }

    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    pub fn file_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileCreation {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O failure that happened while touching `path`
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            path: Some(path),
            source: Some(source),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a parse error with an optional 1-based line number
    pub fn parse(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Parse {
            message: message.into(),
            line,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        use error_codes::*;

        match self {
            Self::NoContainingRoot { .. } => E2001_NO_CONTAINING_ROOT,
            Self::PathConflict { .. } => E2002_PATH_CONFLICT,
            Self::DirectoryCreation { .. } => E2003_DIRECTORY_CREATION,
            Self::FileCreation { .. } => E2004_FILE_CREATION,
            Self::Io { .. } => E1000_INTERNAL_ERROR,
            Self::NotFound { .. } => E1006_RESOURCE_NOT_FOUND,
            Self::InvalidInput { .. } => E1001_INVALID_REQUEST,
            Self::Parse { .. } => E1008_INVALID_DATA,
            Self::Config { .. } => E1009_CONFIG,
        }
    }

    /// Whether the failure left storage partially modified.
    ///
    /// Placement does not roll back, so anything past root matching may have
    /// created directories or markers before failing.
    pub fn may_have_mutated(&self) -> bool {
        matches!(
            self,
            Self::PathConflict { .. }
                | Self::DirectoryCreation { .. }
                | Self::FileCreation { .. }
                | Self::Io { .. }
        )
    }
}

impl From<std::io::Error> for StowError {
    fn from(err: std::io::Error) -> Self {
        StowError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

/// Result type alias for convenience
pub type StowResult<T> = Result<T, StowError>;

// ============================================================================
// Standardized API Error Response
// ============================================================================

/// Standardized error codes for user-facing responses
pub mod error_codes {
    /// Internal or storage error
    pub const E1000_INTERNAL_ERROR: &str = "E1000";
    /// Invalid request parameters
    pub const E1001_INVALID_REQUEST: &str = "E1001";
    /// Resource not found
    pub const E1006_RESOURCE_NOT_FOUND: &str = "E1006";
    /// Invalid data format
    pub const E1008_INVALID_DATA: &str = "E1008";
    /// Invalid configuration
    pub const E1009_CONFIG: &str = "E1009";
    /// Target is outside every source root
    pub const E2001_NO_CONTAINING_ROOT: &str = "E2001";
    /// A directory was expected but a file exists
    pub const E2002_PATH_CONFLICT: &str = "E2002";
    /// Directory creation failed
    pub const E2003_DIRECTORY_CREATION: &str = "E2003";
    /// File creation failed
    pub const E2004_FILE_CREATION: &str = "E2004";
}

/// Error envelope presented to the end user when a refactoring is cancelled
///
/// # Example
/// ```rust
/// use stow_foundation::error::{ApiError, StowError};
///
/// let api: ApiError = StowError::no_containing_root("/elsewhere/pkg").into();
/// assert_eq!(api.code, "E2001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Optional actionable suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    /// Add details to an existing error
    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a suggestion to an existing error
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " (details: {})", details)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<StowError> for ApiError {
    fn from(err: StowError) -> Self {
        let api = ApiError::new(err.code(), err.to_string());
        match err {
            StowError::NoContainingRoot { target } => api
                .details(json!({ "target": target }))
                .suggestion("Choose a destination inside one of the project's source roots"),
            StowError::PathConflict { path } => api
                .details(json!({ "path": path.display().to_string() }))
                .suggestion("Rename or remove the file that occupies the package directory name"),
            StowError::DirectoryCreation { path, .. }
            | StowError::FileCreation { path, .. }
            | StowError::Io {
                path: Some(path), ..
            } => api.details(json!({ "path": path.display().to_string() })),
            StowError::Parse {
                line: Some(line), ..
            } => api.details(json!({ "line": line })),
            _ => api,
        }
    }
}
