//! Opaque byte-stream handles for archives.
//!
//! The backup subsystem never decides where an archive lives; callers hand it
//! something that can be opened for reading or writing.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

pub trait WriteSeek: Write + Seek + Send {}
impl<T: Write + Seek + Send> WriteSeek for T {}

/// Something a backup archive can be read from
pub trait ArchiveSource: Send + Sync {
    fn open_for_read(&self) -> io::Result<Box<dyn ReadSeek>>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Something a backup archive can be written to
pub trait ArchiveSink: Send + Sync {
    fn open_for_write(&self) -> io::Result<Box<dyn WriteSeek>>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Archive stored as a regular file
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for FileHandle {
    fn open_for_read(&self) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl ArchiveSink for FileHandle {
    fn open_for_write(&self) -> io::Result<Box<dyn WriteSeek>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Box::new(BufWriter::new(File::create(&self.path)?)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
