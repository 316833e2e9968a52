//! Logging utilities
//!
//! Provides a size-based rolling file writer usable as a tracing-subscriber
//! writer, so the gateway can log to disk in long-running deployments without
//! an external log rotation daemon.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Maximum log file size before rotation (10MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of rotated files to keep
pub const DEFAULT_MAX_FILES: usize = 5;

/// A size-based rolling file writer
///
/// Rotates the log file when it exceeds a size threshold. Rotated files carry
/// a numeric suffix (gateway.log, gateway.log.1, gateway.log.2, ...), with the
/// highest suffix being the oldest.
#[derive(Debug)]
pub struct RollingFileWriter {
    inner: Arc<Mutex<RollingFileInner>>,
}

#[derive(Debug)]
struct RollingFileInner {
    base_path: PathBuf,
    file: Option<File>,
    current_size: u64,
    max_size: u64,
    max_files: usize,
}

impl RollingFileWriter {
    /// Create a new rolling writer
    ///
    /// # Arguments
    /// * `path` - Base path for the log file (e.g., /var/log/gateway.log)
    /// * `max_size` - Maximum file size in bytes before rotation
    /// * `max_files` - Maximum number of rotated files to keep
    pub fn new(path: impl AsRef<Path>, max_size: u64, max_files: usize) -> io::Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Resume appending to an existing file rather than truncating it
        let current_size = fs::metadata(&base_path).map(|m| m.len()).unwrap_or(0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&base_path)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(RollingFileInner {
                base_path,
                file: Some(file),
                current_size,
                max_size,
                max_files,
            })),
        })
    }

    /// Create a rolling writer with default settings (10MB, 5 files)
    pub fn with_defaults(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(path, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_FILES)
    }
}

impl RollingFileInner {
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;

        // Shift existing rotations up by one, dropping the oldest
        for i in (1..self.max_files).rev() {
            let from = self.rotated_path(i);
            let to = self.rotated_path(i + 1);
            if from.exists() {
                if i + 1 >= self.max_files {
                    fs::remove_file(&from).ok();
                } else {
                    fs::rename(&from, &to).ok();
                }
            }
        }

        let rotated = self.rotated_path(1);
        if self.base_path.exists() {
            fs::rename(&self.base_path, &rotated)?;
        }

        self.file = Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.base_path)?,
        );
        self.current_size = 0;

        Ok(())
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path.file_name().unwrap().to_string_lossy().to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap();

        if inner.current_size + buf.len() as u64 > inner.max_size {
            inner.rotate()?;
        }

        if let Some(ref mut file) = inner.file {
            let written = file.write(buf)?;
            inner.current_size += written as u64;
            Ok(written)
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "log file not open"))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(ref mut file) = inner.file {
            file.flush()
        } else {
            Ok(())
        }
    }
}

impl Clone for RollingFileWriter {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
