// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Topic Builder
//!
//! Builds the page of one topic directory. Every failure is logged here and
//! reported as `false`; nothing propagates to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::assemble;
use crate::core::config::Config;
use crate::core::error::{JoinError, Result};
use crate::fragment;
use crate::generators::PageWriter;
use crate::ranges;

/// Name of a topic: the final component of its directory path.
pub fn topic_name(topic_dir: &Path) -> String {
    topic_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builds `topic_dir` into `<lessons_root>/<topic><output_suffix>`.
///
/// Returns `true` when the page was written. On failure the error is logged
/// and no output is written.
pub fn build(
    topic_dir: &Path,
    config: &Config,
    writer: &dyn PageWriter,
) -> bool {
    let name = topic_name(topic_dir);
    info!("Processing topic: {}", name);

    match try_build(topic_dir, &name, config, writer) {
        Ok(out_path) => {
            info!("Wrote final HTML: {}", out_path.display());
            true
        }
        Err(err) => {
            error!("Topic '{}' failed: {}", name, err);
            false
        }
    }
}

fn try_build(
    topic_dir: &Path,
    name: &str,
    config: &Config,
    writer: &dyn PageWriter,
) -> Result<PathBuf> {
    let template_path = fragment::find_template(topic_dir, config)?;
    let fragments = fragment::locate(topic_dir, config)?.log_warnings();

    let overlaps = ranges::validate(&fragments);
    if let Some(warning) = ranges::overlap_warning(name, &overlaps) {
        warn!("{}", warning);
    }

    let template_text = fs::read_to_string(&template_path)
        .map_err(|e| JoinError::io_error(&template_path, e))?;
    let page =
        assemble::assemble(&template_text, &fragments, &config.markup)?
            .log_warnings();

    let out_path = config.output_path(name);
    writer.write_page(&out_path, &page)?;
    Ok(out_path)
}
