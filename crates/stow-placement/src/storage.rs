//! Storage capability consumed by the resolver

use std::io;
use std::path::Path;
use stow_foundation::{DirHandle, Entry, FileHandle};

/// The handful of storage operations placement needs.
///
/// Backends may be a real filesystem, an in-memory double, or a host's own
/// project model. Handles returned by a backend identify entries: two equal
/// [`FileHandle`]s are the same file.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectStorage {
    /// Entry at `path`, or `None` when nothing exists there
    fn lookup(&self, path: &Path) -> io::Result<Option<Entry>>;

    /// Direct child `name` of `dir`
    fn find_child(&self, dir: &DirHandle, name: &str) -> io::Result<Option<Entry>>;

    /// Create directory `name` inside `parent`; fails if it already exists
    fn create_directory(&self, parent: &DirHandle, name: &str) -> io::Result<DirHandle>;

    /// Create an empty file `name` inside `parent`; fails if it already exists
    fn create_file(&self, parent: &DirHandle, name: &str) -> io::Result<FileHandle>;

    fn read_content(&self, file: &FileHandle) -> io::Result<String>;

    /// Replace the whole content of `file`
    fn set_content(&self, file: &FileHandle, text: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.lookup(path)?.is_some())
    }

    fn is_directory(&self, path: &Path) -> io::Result<bool> {
        Ok(matches!(self.lookup(path)?, Some(Entry::Directory(_))))
    }
}
