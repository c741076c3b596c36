//! Foundation Layer - core types shared by every stow crate
//!
//! - [`error`]: the `StowError` taxonomy and the `ApiError` envelope shown to users
//! - [`model`]: storage handles and the placement result
//! - [`path`]: separator normalization and root-relative path arithmetic

pub mod error;
pub mod model;
pub mod path;

// Re-export commonly used types for convenience
pub use error::{ApiError, StowError, StowResult};
pub use model::{DirHandle, Entry, FileHandle, PlacementKind, PlacementResult};
