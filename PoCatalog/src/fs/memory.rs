//! In-memory file system

use std::collections::BTreeMap;
use std::io::{self, Cursor, ErrorKind, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use super::{FileInfo, FileSystem};
use crate::error::Result;

#[derive(Debug, Clone)]
enum Node {
    File { data: Arc<[u8]>, modified: SystemTime },
    Dir { modified: SystemTime },
}

impl Node {
    fn info(&self) -> FileInfo {
        match self {
            Node::File { data, modified } => FileInfo {
                is_dir: false,
                len: data.len() as u64,
                modified: Some(*modified),
            },
            Node::Dir { modified } => FileInfo {
                is_dir: true,
                len: 0,
                modified: Some(*modified),
            },
        }
    }
}

/// A virtual file tree kept in memory.
///
/// Adding a file creates its parent directories. The empty path and `.`
/// name the (always present) root.
///
/// # Example
///
/// ```
/// use pocatalog::fs::{FileSystem, MemFs};
/// use std::path::Path;
///
/// let fs = MemFs::new();
/// fs.add_file("locales/de/app.po", "msgid \"Hi\"\nmsgstr \"Hallo\"\n");
/// assert!(fs.stat(Path::new("locales/de"))?.is_dir);
/// # Ok::<(), pocatalog::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MemFs {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MemFs {
    /// Create an empty file system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let path = normalize(path.as_ref());
        let now = SystemTime::now();
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir { modified: now });
        }
        nodes.insert(
            path,
            Node::File {
                data: Arc::from(contents.as_ref()),
                modified: now,
            },
        );
    }

    /// Add an empty directory (and its parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let now = SystemTime::now();
        let mut nodes = self.nodes.write().unwrap_or_else(PoisonError::into_inner);
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir { modified: now });
        }
    }

    /// Number of files and directories stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, path: &Path) -> Option<Node> {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

impl FileSystem for MemFs {
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send + '_>> {
        let path = normalize(path);
        match self.node(&path) {
            Some(Node::File { data, .. }) => Ok(Box::new(Cursor::new(data))),
            Some(Node::Dir { .. }) => Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )
            .into()),
            None => Err(not_found(&path).into()),
        }
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let path = normalize(path);
        if path.as_os_str().is_empty() {
            return Ok(FileInfo {
                is_dir: true,
                len: 0,
                modified: None,
            });
        }
        self.node(&path)
            .map(|node| node.info())
            .ok_or_else(|| not_found(&path).into())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let path = normalize(path);
        if !self.stat(&path)?.is_dir {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("not a directory: {}", path.display()),
            )
            .into());
        }
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(nodes
            .keys()
            .filter(|child| child.parent() == Some(path.as_path()))
            .filter_map(|child| child.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Drop `.` components so `./a/b` and `a/b` name the same node.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}
