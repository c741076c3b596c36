//! Real filesystem backend

use crate::storage::ProjectStorage;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use stow_foundation::{DirHandle, Entry, FileHandle};

/// [`ProjectStorage`] over `std::fs`.
///
/// Handles carry paths exactly as given; symlinks are followed when probing
/// but never resolved into canonical paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectStorage for LocalStorage {
    fn lookup(&self, path: &Path) -> io::Result<Option<Entry>> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(Entry::Directory(DirHandle::new(path)))),
            Ok(_) => Ok(Some(Entry::File(FileHandle::new(path)))),
            // A plain file somewhere up the path also means "nothing here";
            // the chain walk reports it as a conflict.
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn find_child(&self, dir: &DirHandle, name: &str) -> io::Result<Option<Entry>> {
        self.lookup(&dir.child_path(name))
    }

    fn create_directory(&self, parent: &DirHandle, name: &str) -> io::Result<DirHandle> {
        let path = parent.child_path(name);
        fs::create_dir(&path)?;
        Ok(DirHandle::new(path))
    }

    fn create_file(&self, parent: &DirHandle, name: &str) -> io::Result<FileHandle> {
        let path = parent.child_path(name);
        OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok(FileHandle::new(path))
    }

    fn read_content(&self, file: &FileHandle) -> io::Result<String> {
        fs::read_to_string(file.path())
    }

    fn set_content(&self, file: &FileHandle, text: &str) -> io::Result<()> {
        fs::write(file.path(), text)
    }
}
