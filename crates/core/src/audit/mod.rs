//! Append-only audit trail with size-based rotation.
//!
//! Each line is `[YYYY-MM-DD HH:MM:SS] message`. When a write would push the
//! file past `max_bytes`, `audit.log` becomes `audit.log.1`, older backups shift
//! up by one and the oldest beyond `backups` is dropped.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use log::error;

use crate::constants::{AUDIT_LOG_BACKUPS, AUDIT_LOG_MAX_BYTES};
use crate::errors::{Error, Result};

pub struct AuditLog {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    // Serializes rotation + append across request tasks
    write_lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_rotation(path, AUDIT_LOG_MAX_BYTES, AUDIT_LOG_BACKUPS)
    }

    pub fn with_rotation(path: impl Into<PathBuf>, max_bytes: u64, backups: usize) -> Self {
        AuditLog {
            path: path.into(),
            max_bytes,
            backups,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line.
    pub fn record(&self, message: &str) -> Result<()> {
        let line = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message.replace('\n', " ")
        );

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Unexpected("Audit log lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if self.should_rotate(line.len() as u64)? {
            self.rotate()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Like [`record`](Self::record) but never fails; problems are logged.
    pub fn record_or_log(&self, message: &str) {
        if let Err(e) = self.record(message) {
            error!("Failed to write audit log entry: {}", e);
        }
    }

    /// Full text of the current log file, or `None` if it does not exist yet.
    pub fn read_all(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn should_rotate(&self, incoming: u64) -> Result<bool> {
        if self.max_bytes == 0 {
            return Ok(false);
        }
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() > 0 && meta.len() + incoming > self.max_bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&self) -> Result<()> {
        if self.backups == 0 {
            fs::remove_file(&self.path)?;
            return Ok(());
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;
        Ok(())
    }
}
