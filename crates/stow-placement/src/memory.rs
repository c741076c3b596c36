//! In-memory backend for hosts without a real filesystem and for tests

use crate::storage::ProjectStorage;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use stow_foundation::{DirHandle, Entry, FileHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Directory,
    File(String),
}

/// [`ProjectStorage`] kept in a sorted map of paths.
///
/// Single-threaded: mutation goes through a `RefCell`.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with the given directories (and their ancestors)
    pub fn with_directories<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let storage = Self::new();
        for dir in dirs {
            storage.add_directory(dir);
        }
        storage
    }

    /// Add a directory and any missing ancestors
    pub fn add_directory(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Directory);
        }
    }

    /// Add (or replace) a file, creating missing parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_directory(parent);
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(content.to_string()));
    }

    /// Content of the file at `path`, if it is a file
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.nodes.borrow().contains_key(path.as_ref())
    }

    /// Every stored path, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.borrow().keys().cloned().collect()
    }

    fn create(&self, parent: &DirHandle, name: &str, node: Node) -> io::Result<PathBuf> {
        let mut nodes = self.nodes.borrow_mut();
        if nodes.get(parent.path()) != Some(&Node::Directory) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory {} does not exist", parent.path().display()),
            ));
        }
        let path = parent.child_path(name);
        if nodes.contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        nodes.insert(path.clone(), node);
        Ok(path)
    }
}

impl ProjectStorage for InMemoryStorage {
    fn lookup(&self, path: &Path) -> io::Result<Option<Entry>> {
        Ok(self.nodes.borrow().get(path).map(|node| match node {
            Node::Directory => Entry::Directory(DirHandle::new(path)),
            Node::File(_) => Entry::File(FileHandle::new(path)),
        }))
    }

    fn find_child(&self, dir: &DirHandle, name: &str) -> io::Result<Option<Entry>> {
        self.lookup(&dir.child_path(name))
    }

    fn create_directory(&self, parent: &DirHandle, name: &str) -> io::Result<DirHandle> {
        self.create(parent, name, Node::Directory).map(DirHandle::new)
    }

    fn create_file(&self, parent: &DirHandle, name: &str) -> io::Result<FileHandle> {
        self.create(parent, name, Node::File(String::new()))
            .map(FileHandle::new)
    }

    fn read_content(&self, file: &FileHandle) -> io::Result<String> {
        self.content(file.path()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", file.path().display()),
            )
        })
    }

    fn set_content(&self, file: &FileHandle, text: &str) -> io::Result<()> {
        match self.nodes.borrow_mut().get_mut(file.path()) {
            Some(Node::File(content)) => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", file.path().display()),
            )),
        }
    }
}
