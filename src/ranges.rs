// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Range Validator
//!
//! Finds section numbers claimed by more than one fragment. The result is
//! advisory: assembly never changes because of it.

use std::collections::BTreeSet;

use crate::core::error::Warning;
use crate::fragment::Fragment;

/// Returns the distinct numbers covered more than once, ascending.
///
/// Each fragment covers `start..=end`. A reversed range (`end < start`)
/// covers nothing. Ranges are swept in start order, so the cost follows the
/// number of fragments and the size of the overlap, not the width of the
/// ranges.
pub fn validate(fragments: &[Fragment]) -> BTreeSet<u64> {
    let mut spans: Vec<(u64, u64)> = fragments
        .iter()
        .filter(|fragment| !fragment.is_reversed())
        .map(|fragment| (fragment.start, fragment.end))
        .collect();
    spans.sort_unstable();

    let mut overlaps = BTreeSet::new();
    // Highest number covered by the spans swept so far.
    let mut reach: Option<u64> = None;
    for (start, end) in spans {
        if let Some(covered) = reach.filter(|&covered| covered >= start) {
            overlaps.extend(start..=end.min(covered));
        }
        reach = Some(reach.map_or(end, |covered| covered.max(end)));
    }
    overlaps
}

/// Wraps a non-empty overlap set as the per-topic warning.
pub fn overlap_warning(
    topic: &str,
    overlaps: &BTreeSet<u64>,
) -> Option<Warning> {
    if overlaps.is_empty() {
        return None;
    }
    Some(Warning::Overlap {
        topic: topic.to_string(),
        numbers: overlaps.iter().copied().collect(),
    })
}
