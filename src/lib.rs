// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # LessonJoin Library
//!
//! LessonJoin assembles one HTML page per lesson topic. Each topic directory
//! holds a page template and a numbered set of fragment files; the content
//! blocks of every fragment are spliced, in order, into a fixed position of
//! the template.
//!
//! The pipeline, leaf first:
//!
//! - [`fragment`]: finds and orders the fragments of a topic.
//! - [`ranges`]: reports section numbers claimed twice.
//! - [`extract`]: pulls content blocks out of a fragment.
//! - [`assemble`]: splices blocks into the template.
//! - [`topic`]: builds one topic, turning every failure into `false`.
//! - [`process`]: discovers topics and builds them all.

#![doc = include_str!("../README.md")]
#![crate_name = "lessonjoin"]
#![crate_type = "lib"]

/// Module containing core utilities, such as configuration and error handling.
pub mod core;

/// Template assembly.
pub mod assemble;

/// Provides command-line interface utilities.
pub mod cli;

/// Document model over `html5ever`.
pub mod dom;

/// Content block extraction.
pub mod extract;

/// Fragment discovery and ordering.
pub mod fragment;

/// Provides output generation utilities.
pub mod generators;

/// Run driver.
pub mod process;

/// Overlap detection across fragment ranges.
pub mod ranges;

/// Per-topic build.
pub mod topic;

pub use crate::core::config::{Config, ConfigBuilder};
pub use crate::core::error::{Advisory, JoinError, Result, StructuralError, Warning};
pub use crate::process::{run, RunReport};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::html::HtmlPageWriter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_intro_topic_end_to_end() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("lessons");
        let intro = root.join("intro");
        fs::create_dir_all(&intro)?;
        fs::write(
            intro.join("intro-template.html"),
            "<!DOCTYPE html><html><head><title>Intro</title></head><body>\
             <div class=\"container\"><header class=\"card\">header</header>\
             <footer>footer</footer></div></body></html>",
        )?;
        fs::write(intro.join("1.html"), "<section class=\"card\">A</section>")?;
        fs::write(
            intro.join("2-3.html"),
            "<section class=\"card\">B</section>\n<section class=\"card\">C</section>",
        )?;

        let config = ConfigBuilder::new()
            .with_override("lessons_root", root.to_string_lossy().into_owned())
            .build()?;
        let report = run(&config, &HtmlPageWriter::new())?;

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.built, vec!["intro"]);
        let page = fs::read_to_string(root.join("intro.html"))?;
        assert!(page.contains(
            "<div class=\"container\"><header class=\"card\">header</header>\
             <section class=\"card\">A</section>\
             <section class=\"card\">B</section>\
             <section class=\"card\">C</section>\
             <footer>footer</footer></div>"
        ));
        Ok(())
    }
}
