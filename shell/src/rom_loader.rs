//! ROM loading: turns a user-chosen file into a [`RomImage`].
//!
//! No content or extension validation happens here beyond unpacking ZIP
//! archives; whether the bytes are a playable game is the engine's call.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::debug;
use zpaceway_core::rom::RomImage;

use crate::error::ReadError;

/// A file handle picked by the user (file dialog, drag-and-drop, CLI).
pub trait RomFile {
    /// Display name, including extension.
    fn name(&self) -> &str;

    /// Read the complete contents. No partial results.
    fn read_all(&mut self) -> Result<Vec<u8>, ReadError>;
}

/// A file on the local filesystem.
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RomFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&mut self) -> Result<Vec<u8>, ReadError> {
        let mut file = File::open(&self.path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

pub struct RomLoader {
    extract_zip: bool,
}

impl RomLoader {
    pub fn new(extract_zip: bool) -> Self {
        Self { extract_zip }
    }

    /// Read `file` in full. A `.zip` file yields its first file entry when
    /// archive extraction is enabled.
    pub fn load(&self, file: &mut dyn RomFile) -> Result<RomImage, ReadError> {
        let name = file.name().to_string();
        let data = file.read_all()?;
        debug!(file = %name, bytes = data.len(), "ROM file read");

        if self.extract_zip && is_zip_name(&name) {
            let (entry_name, data) = first_zip_entry(data)?;
            debug!(entry = %entry_name, bytes = data.len(), "extracted ROM from archive");
            return Ok(RomImage::new(entry_name, data));
        }

        Ok(RomImage::new(name, data))
    }
}

impl Default for RomLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

fn is_zip_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Extract the first non-directory entry of an in-memory ZIP archive.
fn first_zip_entry(data: Vec<u8>) -> Result<(String, Vec<u8>), ReadError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| ReadError::Archive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ReadError::Archive(format!("entry {i}: {e}")))?;

        // Skip directories
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        return Ok((name, data));
    }

    Err(ReadError::EmptyArchive)
}
