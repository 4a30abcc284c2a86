// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # LessonJoin CLI
//!
//! Entry point of the `lessonjoin` binary. Parses arguments, initialises the
//! logger, builds every topic under the lessons root and exits with `0` when
//! all topics were built, `1` otherwise.

use anyhow::Context;
use log::{error, info};
use std::process;

use lessonjoin::cli;
use lessonjoin::generators::html::HtmlPageWriter;
use lessonjoin::process::run;

/// Resolves configuration and runs the build, returning the exit status.
fn execute(matches: &clap::ArgMatches) -> anyhow::Result<i32> {
    let config = cli::resolve_config(matches)
        .context("Failed to load LessonJoin configuration")?;
    info!("Assembling lessons under {}", config.lessons_root.display());

    let writer = HtmlPageWriter::new().with_atomic_writes(config.atomic_writes);
    let report = run(&config, &writer).with_context(|| {
        format!("Failed to build lessons under {}", config.lessons_root.display())
    })?;

    info!(
        "Built {} topics, {} failed",
        report.built.len(),
        report.failed.len()
    );
    Ok(report.exit_code())
}

fn main() {
    let matches = cli::build().get_matches();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(cli::log_level(&matches).as_str()),
    )
    .init();

    let code = match execute(&matches) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            1
        }
    };
    process::exit(code);
}
