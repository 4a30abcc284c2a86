// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Fragment Locator
//!
//! Classifies the entries of a topic directory and returns its fragments in
//! assembly order. A fragment is named `<start>.html` or `<start>-<end>.html`
//! (extension case-insensitive); anything else that is not the template is
//! ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::core::config::Config;
use crate::core::error::{Advisory, JoinError, Result, Warning};

static FRAGMENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+)(?:-([0-9]+))?\.html$").unwrap()
});

/// What a directory entry is, decided from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The topic's template.
    Template,
    /// A numbered fragment with its declared range.
    Fragment {
        /// First section number.
        start: u64,
        /// Last section number, as declared.
        end: u64,
    },
    /// Anything else.
    Unrecognized,
}

/// A fragment file and its declared section range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// First section number.
    pub start: u64,
    /// Last section number. May be below `start`; see [`Fragment::is_reversed`].
    pub end: u64,
    /// Location of the fragment file.
    pub path: PathBuf,
}

impl Fragment {
    /// Whether the declared end lies below the start.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// File name of the fragment, for diagnostics.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parses a fragment file name into `(start, end)`. `end` equals `start`
/// when the name has no range suffix. Numbers that overflow `u64` do not
/// parse.
pub fn parse_range(name: &str) -> Option<(u64, u64)> {
    let captures = FRAGMENT_NAME_RE.captures(name)?;
    let start = captures.get(1)?.as_str().parse().ok()?;
    let end = match captures.get(2) {
        Some(end) => end.as_str().parse().ok()?,
        None => start,
    };
    Some((start, end))
}

/// Classifies one directory entry name. The template check runs first.
pub fn classify(name: &str, template_suffix: &str) -> EntryKind {
    if name.ends_with(template_suffix) {
        return EntryKind::Template;
    }
    match parse_range(name) {
        Some((start, end)) => EntryKind::Fragment { start, end },
        None => EntryKind::Unrecognized,
    }
}

/// Lists the names of the regular files in `dir`, in directory order.
pub(crate) fn file_names(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).map_err(|e| JoinError::io_error(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| JoinError::io_error(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Returns the path of the single template in `topic_dir`.
///
/// # Errors
///
/// `MissingTemplate` when there is none, `AmbiguousTemplate` when there are
/// several.
pub fn find_template(topic_dir: &Path, config: &Config) -> Result<PathBuf> {
    let mut templates: Vec<String> = file_names(topic_dir)?
        .into_iter()
        .filter(|name| {
            classify(name, &config.template_suffix) == EntryKind::Template
        })
        .collect();

    match templates.len() {
        0 => Err(JoinError::MissingTemplate {
            dir: topic_dir.to_path_buf(),
        }),
        1 => Ok(topic_dir.join(templates.remove(0))),
        _ => {
            templates.sort();
            Err(JoinError::AmbiguousTemplate {
                dir: topic_dir.to_path_buf(),
                names: templates,
            })
        }
    }
}

/// Builds the fragment list from entry names given in directory order:
/// classification, reversed-range warnings, then a stable sort on `start`.
pub fn collect_fragments<I>(
    topic_dir: &Path,
    names: I,
    template_suffix: &str,
) -> Advisory<Vec<Fragment>>
where
    I: IntoIterator<Item = String>,
{
    let mut fragments = Vec::new();
    let mut warnings = Vec::new();

    for name in names {
        match classify(&name, template_suffix) {
            EntryKind::Fragment { start, end } => {
                if end < start {
                    warnings.push(Warning::ReversedRange {
                        file: name.clone(),
                        start,
                        end,
                    });
                }
                fragments.push(Fragment {
                    start,
                    end,
                    path: topic_dir.join(&name),
                });
            }
            EntryKind::Template => {}
            EntryKind::Unrecognized => {
                debug!("Ignoring {} in {}", name, topic_dir.display());
            }
        }
    }

    // `sort_by_key` is stable: equal starts keep directory order.
    fragments.sort_by_key(|fragment| fragment.start);
    Advisory {
        value: fragments,
        warnings,
    }
}

/// Locates the fragments of `topic_dir`, sorted by start.
pub fn locate(
    topic_dir: &Path,
    config: &Config,
) -> Result<Advisory<Vec<Fragment>>> {
    let names = file_names(topic_dir)?;
    Ok(collect_fragments(topic_dir, names, &config.template_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SUFFIX: &str = "-template.html";

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("3.html"), Some((3, 3)));
        assert_eq!(parse_range("3-5.html"), Some((3, 5)));
        assert_eq!(parse_range("07-9.HTML"), Some((7, 9)));
        assert_eq!(parse_range("5-2.html"), Some((5, 2)));
        assert_eq!(parse_range("3-.html"), None);
        assert_eq!(parse_range("a3.html"), None);
        assert_eq!(parse_range("3.htm"), None);
        assert_eq!(parse_range("3.html.bak"), None);
        assert_eq!(parse_range("99999999999999999999999.html"), None);
    }

    #[test]
    fn test_classify_is_total() {
        assert_eq!(classify("intro-template.html", SUFFIX), EntryKind::Template);
        assert_eq!(
            classify("2-4.html", SUFFIX),
            EntryKind::Fragment { start: 2, end: 4 }
        );
        assert_eq!(classify("notes.txt", SUFFIX), EntryKind::Unrecognized);
        assert_eq!(classify("intro.html", SUFFIX), EntryKind::Unrecognized);
    }

    #[test]
    fn test_fragments_sorted_by_start() {
        let located = collect_fragments(
            Path::new("t"),
            names(&["5.html", "1.html", "readme.md", "3.html"]),
            SUFFIX,
        );
        let starts: Vec<u64> =
            located.value.iter().map(|f| f.start).collect();
        assert_eq!(starts, vec![1, 3, 5]);
        assert!(located.warnings.is_empty());
        assert_eq!(located.value[0].path, Path::new("t").join("1.html"));
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let located = collect_fragments(
            Path::new("t"),
            names(&["2-9.html", "1.html", "2.html"]),
            SUFFIX,
        );
        let files: Vec<String> =
            located.value.iter().map(Fragment::file_name).collect();
        assert_eq!(files, vec!["1.html", "2-9.html", "2.html"]);
    }

    #[test]
    fn test_reversed_range_warns_and_is_kept() {
        let located =
            collect_fragments(Path::new("t"), names(&["5-2.html"]), SUFFIX);
        assert_eq!(located.value.len(), 1);
        assert!(located.value[0].is_reversed());
        assert_eq!(
            located.warnings,
            vec![Warning::ReversedRange {
                file: "5-2.html".to_string(),
                start: 5,
                end: 2,
            }]
        );
    }

    #[test]
    fn test_locate_reads_directory() {
        let temp_dir = TempDir::new().unwrap();
        let topic = temp_dir.path();
        for name in ["intro-template.html", "2-3.html", "1.html", "x.css"] {
            fs::write(topic.join(name), "").unwrap();
        }
        fs::create_dir(topic.join("4.html")).unwrap();

        let located = locate(topic, &Config::default()).unwrap();
        let files: Vec<String> =
            located.value.iter().map(Fragment::file_name).collect();
        assert_eq!(files, vec!["1.html", "2-3.html"]);
    }

    #[test]
    fn test_find_template() {
        let temp_dir = TempDir::new().unwrap();
        let topic = temp_dir.path();
        let config = Config::default();

        assert!(matches!(
            find_template(topic, &config),
            Err(JoinError::MissingTemplate { .. })
        ));

        fs::write(topic.join("b-template.html"), "").unwrap();
        assert_eq!(
            find_template(topic, &config).unwrap(),
            topic.join("b-template.html")
        );

        fs::write(topic.join("a-template.html"), "").unwrap();
        match find_template(topic, &config) {
            Err(JoinError::AmbiguousTemplate { names, .. }) => {
                assert_eq!(names, vec!["a-template.html", "b-template.html"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
