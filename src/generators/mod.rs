// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Output Generators
//!
//! The output seam of a build: assembled pages are handed to a
//! [`PageWriter`], which decides how they reach storage.

use std::path::Path;

use crate::core::error::Result;

/// HTML page output.
pub mod html;

/// Writes assembled pages.
pub trait PageWriter: std::fmt::Debug {
    /// Writes `content` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the page could not be written. Nothing is retried.
    fn write_page(&self, path: &Path, content: &str) -> Result<()>;
}
