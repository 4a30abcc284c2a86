// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Run Driver
//!
//! Discovers the topic directories under the lessons root and builds each of
//! them. Topics are processed one after another in name order; a failing
//! topic never stops the others.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::core::config::Config;
use crate::core::error::{JoinError, Result};
use crate::fragment::{self, classify, EntryKind};
use crate::generators::PageWriter;
use crate::topic;

/// Outcome of a run over every topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Topics whose page was written.
    pub built: Vec<String>,
    /// Topics that failed.
    pub failed: Vec<String>,
}

impl RunReport {
    /// Whether every topic was built.
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Process exit status for this report: `0` on success, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Lists the topic directories directly under `root`, sorted by name. A
/// directory qualifies when it holds at least one file whose name ends with
/// the template suffix. A subdirectory that cannot be listed is logged and
/// skipped.
pub fn find_topic_dirs(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(root).map_err(|e| JoinError::io_error(root, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| JoinError::io_error(root, e))?.path();
        if !path.is_dir() {
            continue;
        }
        let names = match fragment::file_names(&path) {
            Ok(names) => names,
            Err(err) => {
                warn!("Skipping unreadable directory: {}", err);
                continue;
            }
        };
        let has_template = names.iter().any(|name| {
            classify(name, &config.template_suffix) == EntryKind::Template
        });
        if has_template {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Builds every topic under `config.lessons_root`.
///
/// # Errors
///
/// `NoTopics` when the root holds no topic directory, in which case nothing
/// is built; an IO error when the root cannot be listed. Per-topic failures
/// are reported in the returned [`RunReport`] instead.
pub fn run(config: &Config, writer: &dyn PageWriter) -> Result<RunReport> {
    let root = &config.lessons_root;
    let topic_dirs = find_topic_dirs(root, config)?;
    if topic_dirs.is_empty() {
        return Err(JoinError::NoTopics { root: root.clone() });
    }
    info!("Found {} topics under {}", topic_dirs.len(), root.display());

    let mut report = RunReport::default();
    for topic_dir in &topic_dirs {
        let name = topic::topic_name(topic_dir);
        if topic::build(topic_dir, config, writer) {
            report.built.push(name);
        } else {
            report.failed.push(name);
        }
    }

    if !report.success() {
        error!(
            "{} of {} topics failed: {}",
            report.failed.len(),
            topic_dirs.len(),
            report.failed.join(", ")
        );
    }
    Ok(report)
}
