//! Storage handles and the result of a placement

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a directory in project storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirHandle(PathBuf);

impl DirHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path of a direct child of this directory
    pub fn child_path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

/// Handle to a plain file in project storage.
///
/// Two handles are the same file when the storage backend produced equal
/// handles for them; no canonicalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }
}

/// An existing storage entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory(DirHandle),
    File(FileHandle),
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::Directory(dir) => dir.path(),
            Entry::File(file) => file.path(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }
}

/// How the destination file was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementKind {
    /// Target is the file being refactored; insert before the original declaration
    SameFile,
    /// Target already existed as a plain file
    ExistingFile,
    /// Target named a package; content goes into its marker file
    PackageMarker,
    /// A new source file was placed inside the package chain
    NewFile,
}

/// Resolved destination for an extracted declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementResult {
    pub file: FileHandle,
    pub kind: PlacementKind,
    /// Index into the caller's root list of the root that contains the target
    pub root_index: usize,
    /// Directories and files created by this placement, in creation order
    pub created: Vec<PathBuf>,
}

impl PlacementResult {
    /// New content goes before the original declaration instead of at file end
    pub fn inserts_before_declaration(&self) -> bool {
        self.kind == PlacementKind::SameFile
    }

    pub fn created_anything(&self) -> bool {
        !self.created.is_empty()
    }
}
