// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Error Handling for LessonJoin
//!
//! This module defines the error and advisory types shared by every stage of
//! the page-assembly pipeline. The `thiserror` crate is used to derive the
//! error types.
//!
//! Two channels are kept strictly apart:
//!
//! - [`JoinError`] is a hard failure. It aborts the affected scope (one topic,
//!   or the whole run when no topic exists).
//! - [`Warning`], carried inside an [`Advisory`], never aborts anything. It is
//!   logged and processing continues unchanged.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the LessonJoin library.
pub type Result<T> = std::result::Result<T, JoinError>;

/// The main error type for LessonJoin.
#[derive(Error, Debug)]
pub enum JoinError {
    /// The lessons root holds no directory containing a template.
    #[error("No topic directories found under `{root:?}`.")]
    NoTopics {
        /// The lessons root that was scanned.
        root: PathBuf,
    },

    /// A topic directory has no template file.
    #[error("No template file found in `{dir:?}`.")]
    MissingTemplate {
        /// The topic directory.
        dir: PathBuf,
    },

    /// A topic directory has more than one template file.
    #[error("Multiple template files found in `{dir:?}`: {names:?}.")]
    AmbiguousTemplate {
        /// The topic directory.
        dir: PathBuf,
        /// Names of every template candidate, sorted.
        names: Vec<String>,
    },

    /// The template does not have the structure the assembler needs.
    #[error("Template structure error: {0}.")]
    Structural(#[from] StructuralError),

    /// Error related to configuration loading or validation.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Structural defects of a template, each fatal to its topic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    /// No container element anywhere in the template.
    #[error("missing container")]
    MissingContainer,
    /// The container holds no header marker.
    #[error("missing header")]
    MissingHeader,
    /// The container holds no footer marker.
    #[error("missing footer")]
    MissingFooter,
}

impl From<std::io::Error> for JoinError {
    /// Converts a standard IO error into a `JoinError::IOError` with an
    /// empty path.
    fn from(source: std::io::Error) -> Self {
        JoinError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl JoinError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the configuration file causing the error.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        JoinError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Wraps an IO error as an `IOError` variant with the specified path.
    pub fn io_error<P: Into<PathBuf>>(
        path: P,
        source: std::io::Error,
    ) -> Self {
        JoinError::IOError {
            path: path.into(),
            source,
        }
    }
}

/// Advisory diagnostics. None of these stops a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A fragment file name declares an end below its start.
    ReversedRange {
        /// The fragment file name.
        file: String,
        /// The declared start.
        start: u64,
        /// The declared end.
        end: u64,
    },

    /// A fragment file holds no content block.
    EmptyFragment {
        /// Path of the fragment.
        path: PathBuf,
    },

    /// Section numbers claimed by more than one fragment of a topic.
    Overlap {
        /// The topic name.
        topic: String,
        /// Distinct overlapping numbers, ascending.
        numbers: Vec<u64>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ReversedRange { file, start, end } => write!(
                f,
                "Fragment {} has reversed range ({} > {})",
                file, start, end
            ),
            Warning::EmptyFragment { path } => write!(
                f,
                "No content blocks found in {}",
                path.display()
            ),
            Warning::Overlap { topic, numbers } => write!(
                f,
                "Overlapping section numbers detected in topic '{}': {:?}",
                topic, numbers
            ),
        }
    }
}

/// A value together with the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory<T> {
    /// The computed value.
    pub value: T,
    /// Warnings raised along the way, in the order they were found.
    pub warnings: Vec<Warning>,
}

impl<T> Advisory<T> {
    /// Logs every warning at `warn` level and returns the bare value.
    pub fn log_warnings(self) -> T {
        for warning in &self.warnings {
            log::warn!("{}", warning);
        }
        self.value
    }
}
