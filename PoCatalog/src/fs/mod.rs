//! File system access used by the catalog loader
//!
//! The loader only needs to open, stat, list and walk. [`OsFs`] maps these
//! onto the real file system; [`MemFs`] keeps a virtual tree in memory.

mod memory;
mod os;

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use crate::error::Result;

pub use memory::MemFs;
pub use os::OsFs;

/// What `stat` reports about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// The path is a directory.
    pub is_dir: bool,
    /// Size in bytes (0 for directories).
    pub len: u64,
    /// Last modification time, when known.
    pub modified: Option<SystemTime>,
}

impl FileInfo {
    #[must_use]
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

/// Returned by a walk visitor to steer the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkControl {
    /// Keep going.
    #[default]
    Continue,
    /// Do not descend into this directory. Ignored for files.
    SkipSubtree,
}

/// Callback invoked for every path visited by [`FileSystem::walk`].
///
/// Receives either the path's [`FileInfo`] or the error hit while reading
/// it. Returning an error aborts the walk with that error.
pub type WalkVisitor<'a> = dyn FnMut(&Path, Result<&FileInfo>) -> Result<WalkControl> + 'a;

/// Read-only file system operations.
pub trait FileSystem: Send + Sync {
    /// Open a file for reading.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send + '_>>;

    /// Describe a path.
    ///
    /// # Errors
    /// Returns an error if the path does not exist.
    fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Names of the entries of a directory, in no particular order.
    ///
    /// # Errors
    /// Returns an error if the path is not a readable directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Name of this file system, for logging.
    fn name(&self) -> &'static str;

    /// Read a whole file into memory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Walk the tree rooted at `root` depth-first, directory entries in
    /// lexicographic order, calling `visit` for the root and every path below.
    ///
    /// # Errors
    /// Returns the first error returned by `visit`.
    fn walk(&self, root: &Path, visit: &mut WalkVisitor<'_>) -> Result<()> {
        match self.stat(root) {
            Ok(info) => walk_from(self, root, &info, visit),
            Err(e) => visit(root, Err(e)).map(|_| ()),
        }
    }
}

fn walk_from<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    info: &FileInfo,
    visit: &mut WalkVisitor<'_>,
) -> Result<()> {
    if visit(path, Ok(info))? == WalkControl::SkipSubtree || !info.is_dir {
        return Ok(());
    }

    let mut names = match fs.read_dir(path) {
        Ok(names) => names,
        Err(e) => return visit(path, Err(e)).map(|_| ()),
    };
    names.sort();

    for name in names {
        let child = path.join(&name);
        match fs.stat(&child) {
            Ok(child_info) => walk_from(fs, &child, &child_info, visit)?,
            Err(e) => {
                visit(&child, Err(e))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> MemFs {
        let fs = MemFs::new();
        fs.add_file("root/b/x.po", "");
        fs.add_file("root/a/z.po", "");
        fs.add_file("root/a/y.po", "");
        fs.add_file("root/c.txt", "");
        fs
    }

    #[test]
    fn test_default_walk_is_sorted_depth_first() {
        let fs = sample();
        let mut seen = Vec::new();
        fs.walk(Path::new("root"), &mut |path, info| {
            info?;
            seen.push(path.to_path_buf());
            Ok(WalkControl::Continue)
        })
        .unwrap();

        let expected: Vec<PathBuf> = [
            "root", "root/a", "root/a/y.po", "root/a/z.po", "root/b", "root/b/x.po", "root/c.txt",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_skip_subtree() {
        let fs = sample();
        let mut seen = Vec::new();
        fs.walk(Path::new("root"), &mut |path, info| {
            let info = info?;
            seen.push(path.to_path_buf());
            if info.is_dir && path.ends_with("a") {
                return Ok(WalkControl::SkipSubtree);
            }
            Ok(WalkControl::Continue)
        })
        .unwrap();
        assert!(seen.contains(&PathBuf::from("root/a")));
        assert!(!seen.contains(&PathBuf::from("root/a/y.po")));
        assert!(seen.contains(&PathBuf::from("root/b/x.po")));
    }

    #[test]
    fn test_missing_root_reaches_visitor() {
        let fs = MemFs::new();
        let result = fs.walk(Path::new("nowhere"), &mut |_, info| {
            info?;
            Ok(WalkControl::Continue)
        });
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
