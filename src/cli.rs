// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for LessonJoin
//!
//! This module defines the argument surface of the `lessonjoin` binary and
//! turns parsed arguments into a [`Config`] and a log level.
//!
//! # Examples
//!
//! ```
//! use lessonjoin::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "lessonjoin",
//!     "--root",
//!     "site/lessons",
//!     "-v",
//! ]);
//!
//! assert_eq!(cli::log_level(&matches), log::LevelFilter::Debug);
//! ```

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, LevelFilter};
use std::path::PathBuf;

use crate::core::config::{Config, ConfigBuilder, ENV_PREFIX};
use crate::core::error::Result;

/// The current version of LessonJoin, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds and configures the LessonJoin command-line interface.
pub fn build() -> Command {
    Command::new("lessonjoin")
        .author("LessonJoin Contributors")
        .about("Assembles lesson pages from a template and numbered HTML fragments.")
        .version(VERSION)
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .help("Lessons root holding one directory per topic [default: lessons]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log detail (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .after_help(
            "Each topic directory holds one `<name>-template.html` and any number of \
             `N.html` / `N-M.html` fragments.\nPages are written to `<root>/<topic>.html`.\n\
             Settings may also be given as LESSONJOIN_* environment variables.",
        )
}

/// Log level selected by `-v` / `-q`. Defaults to `Info`.
pub fn log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.get_flag("quiet") {
        return LevelFilter::Warn;
    }
    match matches.get_count("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Resolves the run configuration: `--config` file, then `LESSONJOIN_*`
/// environment variables, then `--root`.
pub fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let mut builder = ConfigBuilder::new().with_env_prefix(ENV_PREFIX);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        debug!("Loading configuration from {}", path.display());
        builder = builder.with_file(path);
    }
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        builder = builder
            .with_override("lessons_root", root.to_string_lossy().into_owned());
    }
    builder.build()
}
