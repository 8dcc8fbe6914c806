//! The real file system

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use walkdir::WalkDir;

use super::{FileInfo, FileSystem, WalkControl, WalkVisitor};
use crate::error::{Error, Result};

/// [`FileSystem`] backed by `std::fs`.
///
/// Walks use `walkdir`, sorted by file name and without following symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn info_from(meta: &fs::Metadata) -> FileInfo {
    FileInfo {
        is_dir: meta.is_dir(),
        len: if meta.is_dir() { 0 } else { meta.len() },
        modified: meta.modified().ok(),
    }
}

impl FileSystem for OsFs {
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        Ok(info_from(&fs::symlink_metadata(path)?))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        fs::read_dir(path)?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn name(&self) -> &'static str {
        "os"
    }

    fn walk(&self, root: &Path, visit: &mut WalkVisitor<'_>) -> Result<()> {
        let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();
        while let Some(next) = entries.next() {
            match next {
                Ok(entry) => match entry.metadata() {
                    Ok(meta) => {
                        let info = info_from(&meta);
                        if visit(entry.path(), Ok(&info))? == WalkControl::SkipSubtree
                            && info.is_dir
                        {
                            entries.skip_current_dir();
                        }
                    }
                    Err(e) => {
                        visit(entry.path(), Err(Error::from(e)))?;
                    }
                },
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    visit(&path, Err(Error::from(e)))?;
                }
            }
        }
        Ok(())
    }
}
