//! Target location resolution
//!
//! Decides which file receives an extracted declaration:
//!
//! | target                               | destination                          |
//! |--------------------------------------|--------------------------------------|
//! | the file being refactored            | that file, before the declaration    |
//! | existing directory (or the root)     | its package marker                   |
//! | existing plain file                  | that file                            |
//! | missing path ending in the extension | new file in a materialized chain     |
//! | any other missing path               | marker of a materialized package     |
//!
//! Root matching happens before any storage access, so a target outside every
//! root fails without side effects. Later failures do not roll back.

use crate::convention::PackageConvention;
use crate::storage::ProjectStorage;
use std::path::{Path, PathBuf};
use stow_foundation::path::{self, RootMatch};
use stow_foundation::{
    DirHandle, Entry, FileHandle, PlacementKind, PlacementResult, StowError, StowResult,
};
use tracing::{debug, error, info};

/// Finds or creates the destination file for an extracted declaration
pub struct TargetLocationResolver<'a> {
    storage: &'a dyn ProjectStorage,
    convention: &'a dyn PackageConvention,
    marker_content: Option<String>,
}

impl<'a> TargetLocationResolver<'a> {
    pub fn new(storage: &'a dyn ProjectStorage, convention: &'a dyn PackageConvention) -> Self {
        Self {
            storage,
            convention,
            marker_content: None,
        }
    }

    /// Initial content written into package markers this resolver creates
    pub fn with_marker_content(mut self, content: Option<String>) -> Self {
        self.marker_content = content;
        self
    }

    /// Resolve `target_path` against the ordered `roots`.
    ///
    /// `source_file` is the file being refactored; when the target is that
    /// very file the result is [`PlacementKind::SameFile`] and nothing is
    /// created.
    pub fn resolve<S: AsRef<str>>(
        &self,
        roots: &[S],
        target_path: &str,
        source_file: Option<&FileHandle>,
    ) -> StowResult<PlacementResult> {
        let target = self.normalize_target(target_path)?;
        let root_match = self.match_root(roots, &target)?;
        let root = DirHandle::new(&root_match.root);
        let mut created = Vec::new();

        let probe = if root_match.is_root() {
            Some(Entry::Directory(root.clone()))
        } else {
            self.storage
                .lookup(Path::new(&target))
                .map_err(|e| StowError::io_at(&target, e))?
        };
        debug!(target = %target, root = %root_match.root, found = ?probe, "Probed target");

        let (file, kind) = match probe {
            Some(Entry::File(file)) if source_file == Some(&file) => {
                debug!(file = %file.path().display(), "Target is the source file");
                (file, PlacementKind::SameFile)
            }
            Some(Entry::Directory(_)) => {
                let dir = self.materialize(&root, root_match.remainder, &mut created)?;
                let marker = self.convention.marker_file_name();
                let file = self.place(&dir, marker, None, &mut created)?;
                (file, PlacementKind::PackageMarker)
            }
            Some(Entry::File(file)) => (file, PlacementKind::ExistingFile),
            None => {
                let marker = self.convention.marker_file_name();
                let (relative_dir, file_name) = if self.convention.is_source_path(&target) {
                    path::split_parent(root_match.remainder)
                } else {
                    (root_match.remainder, marker)
                };
                let dir = self.materialize(&root, relative_dir, &mut created)?;
                let file = self.place(&dir, file_name, None, &mut created)?;
                let kind = if file_name == marker {
                    PlacementKind::PackageMarker
                } else {
                    PlacementKind::NewFile
                };
                (file, kind)
            }
        };

        info!(
            file = %file.path().display(),
            kind = ?kind,
            created = created.len(),
            "Resolved placement"
        );

        Ok(PlacementResult {
            file,
            kind,
            root_index: root_match.index,
            created,
        })
    }

    /// Walk `relative` below `root`, creating missing directories and making
    /// sure every directory on the way holds a package marker.
    ///
    /// Returns the deepest directory. Calling it again with the same
    /// arguments creates nothing.
    pub fn materialize_directory_chain(
        &self,
        root: &DirHandle,
        relative: &str,
    ) -> StowResult<DirHandle> {
        self.materialize(root, relative, &mut Vec::new())
    }

    /// Reuse or create `file_name` in `directory`.
    ///
    /// Existing files are left untouched unless `content` is given, in which
    /// case it replaces theirs. New files start with `content`, or empty.
    pub fn place_file(
        &self,
        directory: &DirHandle,
        file_name: &str,
        content: Option<&str>,
    ) -> StowResult<FileHandle> {
        self.place(directory, file_name, content, &mut Vec::new())
    }

    /// Materialize the package chain for `dir_path` under its containing root,
    /// then place `file_name` inside it.
    pub fn place_file_at<S: AsRef<str>>(
        &self,
        roots: &[S],
        dir_path: &str,
        file_name: &str,
        content: Option<&str>,
    ) -> StowResult<PlacementResult> {
        let target = self.normalize_target(dir_path)?;
        let root_match = self.match_root(roots, &target)?;
        let root = DirHandle::new(&root_match.root);
        let mut created = Vec::new();

        let dir = self.materialize(&root, root_match.remainder, &mut created)?;
        let file = self.place(&dir, file_name, content, &mut created)?;
        let kind = if file_name == self.convention.marker_file_name() {
            PlacementKind::PackageMarker
        } else {
            PlacementKind::NewFile
        };

        Ok(PlacementResult {
            file,
            kind,
            root_index: root_match.index,
            created,
        })
    }

    fn normalize_target(&self, target_path: &str) -> StowResult<String> {
        if target_path.trim().is_empty() {
            return Err(StowError::invalid_input("Target path cannot be empty"));
        }
        Ok(path::to_system_independent(target_path))
    }

    fn match_root<'t, S: AsRef<str>>(
        &self,
        roots: &[S],
        target: &'t str,
    ) -> StowResult<RootMatch<'t>> {
        path::find_containing_root(roots, target).ok_or_else(|| {
            debug!(target = %target, roots = roots.len(), "Target outside every root");
            StowError::no_containing_root(target)
        })
    }

    fn materialize(
        &self,
        root: &DirHandle,
        relative: &str,
        created: &mut Vec<PathBuf>,
    ) -> StowResult<DirHandle> {
        if path::has_parent_segment(relative) {
            return Err(StowError::invalid_input(format!(
                "'{}' leaves its root through '..'",
                relative
            )));
        }
        let mut current = root.clone();

        for segment in path::segments(relative) {
            let child_path = current.child_path(segment);
            let child = self
                .storage
                .find_child(&current, segment)
                .map_err(|e| StowError::io_at(&child_path, e))?;

            current = match child {
                Some(Entry::Directory(dir)) => dir,
                Some(Entry::File(_)) => {
                    return Err(StowError::path_conflict(child_path));
                }
                None => {
                    let dir = self
                        .storage
                        .create_directory(&current, segment)
                        .map_err(|e| {
                            error!(error = %e, path = %child_path.display(), "Failed to create directory");
                            StowError::directory_creation(&child_path, e)
                        })?;
                    info!(path = %dir.path().display(), "Created package directory");
                    created.push(dir.path().to_path_buf());
                    dir
                }
            };

            let marker = self.convention.marker_file_name();
            self.place(&current, marker, None, created)?;
        }

        Ok(current)
    }

    fn place(
        &self,
        directory: &DirHandle,
        file_name: &str,
        content: Option<&str>,
        created: &mut Vec<PathBuf>,
    ) -> StowResult<FileHandle> {
        if matches!(file_name, "" | "." | "..") || file_name.contains(['/', '\\']) {
            return Err(StowError::invalid_input(format!(
                "'{}' is not a file name",
                file_name
            )));
        }
        let file_path = directory.child_path(file_name);
        let existing = self
            .storage
            .find_child(directory, file_name)
            .map_err(|e| StowError::io_at(&file_path, e))?;

        match existing {
            Some(Entry::File(file)) => {
                if let Some(content) = content {
                    self.storage
                        .set_content(&file, content)
                        .map_err(|e| StowError::io_at(&file_path, e))?;
                }
                Ok(file)
            }
            Some(Entry::Directory(_)) => Err(StowError::invalid_input(format!(
                "Expected file, found directory at {}",
                file_path.display()
            ))),
            None => {
                let file = self
                    .storage
                    .create_file(directory, file_name)
                    .map_err(|e| {
                        error!(error = %e, path = %file_path.display(), "Failed to create file");
                        StowError::file_creation(&file_path, e)
                    })?;
                created.push(file.path().to_path_buf());

                let is_marker = file_name == self.convention.marker_file_name();
                let initial = content.or(if is_marker {
                    self.marker_content.as_deref()
                } else {
                    None
                });
                if let Some(initial) = initial {
                    self.storage
                        .set_content(&file, initial)
                        .map_err(|e| StowError::file_creation(&file_path, e))?;
                }

                debug!(path = %file.path().display(), "Created file");
                Ok(file)
            }
        }
    }
}
