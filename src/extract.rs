// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Content Extractor
//!
//! Pulls the content blocks out of a fragment file, in document order.

use std::fmt;
use std::fs;
use std::path::Path;

use markup5ever_rcdom::Handle;

use crate::core::error::{Advisory, JoinError, Result, Warning};
use crate::dom::{self, Document, Selector};

/// An opaque block of page content. Its subtree is moved as-is and never
/// inspected.
pub struct ContentBlock {
    node: Handle,
}

impl ContentBlock {
    /// The detached node.
    pub fn into_node(self) -> Handle {
        self.node
    }

    /// Text of the block, for diagnostics and tests.
    pub fn text(&self) -> String {
        dom::text_content(&self.node)
    }
}

impl fmt::Debug for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentBlock")
            .field("tag", &dom::tag_name(&self.node))
            .finish()
    }
}

/// Extracts every block matching `selector` from fragment text.
///
/// Blocks are found anywhere in the tree and detached from it in document
/// order, so they survive the fragment's own document being dropped. A block
/// nested inside another matching block is detached from its outer block and
/// returned on its own.
pub fn extract_blocks(text: &str, selector: &Selector) -> Vec<ContentBlock> {
    let document = Document::parse(text);
    let nodes = dom::find_all(&document.root(), selector, false);
    nodes
        .into_iter()
        .map(|node| {
            _ = dom::detach(&node);
            ContentBlock { node }
        })
        .collect()
}

/// Reads the fragment at `path` and extracts its blocks. A fragment without
/// blocks yields an `EmptyFragment` warning and an empty list.
pub fn extract(
    path: &Path,
    selector: &Selector,
) -> Result<Advisory<Vec<ContentBlock>>> {
    let text =
        fs::read_to_string(path).map_err(|e| JoinError::io_error(path, e))?;
    let blocks = extract_blocks(&text, selector);

    let mut warnings = Vec::new();
    if blocks.is_empty() {
        warnings.push(Warning::EmptyFragment {
            path: path.to_path_buf(),
        });
    }
    Ok(Advisory {
        value: blocks,
        warnings,
    })
}
