//! Where finished exports go

use std::io;
use std::path::{Path, PathBuf};

/// Final step of an export: store the bytes under `file_name`.
pub trait DownloadSink {
    /// Returns where the file ended up.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        if Path::new(file_name).components().count() != 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{file_name}' is not a plain file name"),
            ));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Keeps deliveries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .rev()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
