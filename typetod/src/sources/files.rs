use std::fs;
use std::path::{Path, PathBuf};

use scribe::{ContentItem, FetchError};

use super::SourceError;

/// A file on disk, read when its turn comes
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    title: String,
}

impl LocalFile {
    pub fn new(path: PathBuf) -> Self {
        let title = path.display().to_string();
        Self { path, title }
    }
}

impl ContentItem for LocalFile {
    fn title(&self) -> &str {
        &self.title
    }

    fn fetch_body(&self) -> Result<String, FetchError> {
        fs::read(&self.path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|error| FetchError::Read {
                path: self.path.clone(),
                error,
            })
    }
}

/// Turn the command line arguments into files, in order
///
/// Directories are only accepted with `recursive`, and are walked in sorted order.
pub fn collect(args: &[String], recursive: bool) -> Result<Vec<LocalFile>, SourceError> {
    let mut files = Vec::new();

    for arg in args {
        let path = PathBuf::from(arg);
        if path.is_file() {
            files.push(LocalFile::new(path));
        } else if path.is_dir() {
            if !recursive {
                return Err(SourceError::Directory(path));
            }
            walk(&path, &mut files)?;
        } else {
            return Err(SourceError::MissingFile(path));
        }
    }

    tracing::debug!(count = files.len(), "Collected files");
    Ok(files)
}

fn walk(directory: &Path, files: &mut Vec<LocalFile>) -> Result<(), SourceError> {
    let read_error = |error| SourceError::ReadDirectory {
        directory: directory.to_path_buf(),
        error,
    };

    let mut entries = fs::read_dir(directory)
        .map_err(read_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.is_file() {
            files.push(LocalFile::new(path));
        }
    }

    Ok(())
}
