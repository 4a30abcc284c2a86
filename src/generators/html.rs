// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # HTML Page Writer
//!
//! Writes assembled pages to disk. With atomic writes enabled, the page is
//! written to a temporary file in the destination directory and renamed over
//! the target, so readers only ever see the old page or the complete new one.
//!
//! ```rust,no_run
//! use lessonjoin::generators::html::HtmlPageWriter;
//! use lessonjoin::generators::PageWriter;
//! use std::path::Path;
//!
//! let writer = HtmlPageWriter::new().with_atomic_writes(true);
//! writer
//!     .write_page(Path::new("lessons/intro.html"), "<html></html>")
//!     .unwrap();
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use super::PageWriter;
use crate::core::error::{JoinError, Result};

/// Filesystem-backed [`PageWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlPageWriter {
    atomic: bool,
}

impl HtmlPageWriter {
    /// Creates a writer with atomic writes enabled.
    pub fn new() -> Self {
        Self { atomic: true }
    }

    /// Enables or disables write-then-rename.
    pub fn with_atomic_writes(self, enable: bool) -> Self {
        Self { atomic: enable }
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)
            .map_err(|e| JoinError::io_error(dir, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| JoinError::io_error(file.path(), e))?;
        _ = file
            .persist(path)
            .map_err(|e| JoinError::io_error(path, e.error))?;
        Ok(())
    }
}

impl Default for HtmlPageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWriter for HtmlPageWriter {
    fn write_page(&self, path: &Path, content: &str) -> Result<()> {
        debug!(
            "Writing {} bytes to {} (atomic: {})",
            content.len(),
            path.display(),
            self.atomic
        );
        if self.atomic {
            self.write_atomic(path, content)
        } else {
            fs::write(path, content).map_err(|e| JoinError::io_error(path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("intro.html");
        fs::write(&path, "old").unwrap();

        HtmlPageWriter::new().write_page(&path, "<p>new</p>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>new</p>");
        let leftovers = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_plain_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("intro.html");

        HtmlPageWriter::new()
            .with_atomic_writes(false)
            .write_page(&path, "page")
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "page");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent").join("intro.html");

        for writer in [
            HtmlPageWriter::new(),
            HtmlPageWriter::new().with_atomic_writes(false),
        ] {
            let err = writer.write_page(&path, "page").unwrap_err();
            assert!(matches!(err, JoinError::IOError { .. }));
            assert!(!path.exists());
        }
    }
}
