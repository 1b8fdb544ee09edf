//! File-system capability used by every command.
//!
//! Commands talk to the disk only through [`FileSystem`]. The free helpers
//! below swallow I/O failures into `bool` / `Option` so no I/O error ever
//! crosses into a command's return value.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

pub fn file_exists(fs: &dyn FileSystem, path: &Path) -> bool {
    fs.exists(path)
}

/// Read a file as UTF-8. Missing or unreadable files yield `None`.
pub fn read_file(fs: &dyn FileSystem, path: &Path) -> Option<String> {
    match fs.read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!("cannot read {}: {err}", path.display());
            None
        }
    }
}

pub fn write_file(fs: &dyn FileSystem, path: &Path, content: &str) -> bool {
    match fs.write(path, content) {
        Ok(()) => true,
        Err(err) => {
            warn!("cannot write {}: {err}", path.display());
            false
        }
    }
}

/// Create a directory and its parents.
pub fn mkdir(fs: &dyn FileSystem, path: &Path) -> bool {
    match fs.create_dir_all(path) {
        Ok(()) => true,
        Err(err) => {
            warn!("cannot create {}: {err}", path.display());
            false
        }
    }
}

/// Read and parse a JSON file. Missing, empty, and malformed files all
/// yield `None`.
pub fn read_json<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Option<T> {
    let content = read_file(fs, path)?;
    if content.is_empty() {
        return None;
    }
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("ignoring malformed JSON in {}: {err}", path.display());
            None
        }
    }
}

/// Two-space indented JSON with a trailing newline.
pub fn to_json_text<T: Serialize>(data: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');
    Ok(text)
}

pub fn write_json<T: Serialize>(fs: &dyn FileSystem, path: &Path, data: &T) -> bool {
    match to_json_text(data) {
        Ok(text) => write_file(fs, path, &text),
        Err(err) => {
            warn!("cannot serialize {}: {err}", path.display());
            false
        }
    }
}
