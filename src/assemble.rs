// Copyright © 2024 LessonJoin. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Template Assembler
//!
//! Splices content blocks into a topic template. The template must contain a
//! container element holding a header marker and a footer marker. Blocks that
//! sit directly inside the container are the output of an earlier build and
//! are discarded; the new blocks are inserted, in order, right before the
//! footer.
//!
//! ```
//! use lessonjoin::assemble::splice;
//! use lessonjoin::core::config::MarkupConfig;
//! use lessonjoin::extract::extract_blocks;
//!
//! let markup = MarkupConfig::default();
//! let template = "<div class=\"container\"><header class=\"card\"></header>\
//!                 <footer></footer></div>";
//! let blocks = extract_blocks("<section class=\"card\">A</section>", &markup.block());
//! let page = splice(template, blocks, &markup).unwrap();
//! assert!(page.contains("<section class=\"card\">A</section><footer>"));
//! ```

use std::fmt;

use log::{debug, info};
use markup5ever_rcdom::Handle;

use crate::core::config::MarkupConfig;
use crate::core::error::{Advisory, Result, StructuralError};
use crate::dom::{self, Document};
use crate::extract::{self, ContentBlock};
use crate::fragment::Fragment;

/// The parsed template with its insertion points resolved.
pub struct Skeleton {
    document: Document,
    container: Handle,
    footer: Handle,
}

impl fmt::Debug for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skeleton")
            .field("document", &self.document)
            .field("container", &dom::tag_name(&self.container))
            .field("footer", &dom::tag_name(&self.footer))
            .finish()
    }
}

impl Skeleton {
    /// Parses `template_text` and finds the container, header and footer.
    /// The first match of each, in document order, is used; the header only
    /// has to exist.
    pub fn parse(template_text: &str, markup: &MarkupConfig) -> Result<Self> {
        let document = Document::parse(template_text);
        let container = dom::find_first(&document.root(), &markup.container())
            .ok_or(StructuralError::MissingContainer)?;
        if dom::find_first(&container, &markup.header()).is_none() {
            return Err(StructuralError::MissingHeader.into());
        }
        let footer = dom::find_first(&container, &markup.footer())
            .ok_or(StructuralError::MissingFooter)?;

        Ok(Self {
            document,
            container,
            footer,
        })
    }

    /// Removes the blocks sitting directly in the container. Deeper blocks
    /// are left alone. Returns how many were removed.
    pub fn clear_stale(&self, markup: &MarkupConfig) -> usize {
        dom::find_all(&self.container, &markup.block(), true)
            .iter()
            .filter(|node| dom::detach(node))
            .count()
    }

    /// Inserts `block` right before the footer.
    pub fn insert(&self, block: ContentBlock) {
        _ = dom::insert_before(&self.footer, block.into_node());
    }

    /// Serializes the page.
    pub fn render(&self) -> Result<String> {
        self.document.serialize()
    }
}

/// Assembles a page from `template_text` and already extracted blocks.
pub fn splice<I>(
    template_text: &str,
    blocks: I,
    markup: &MarkupConfig,
) -> Result<String>
where
    I: IntoIterator<Item = ContentBlock>,
{
    let skeleton = Skeleton::parse(template_text, markup)?;
    _ = skeleton.clear_stale(markup);
    for block in blocks {
        skeleton.insert(block);
    }
    skeleton.render()
}

/// Assembles a page from `template_text` and the fragments, in the order
/// given. Each fragment is read and its blocks inserted before the footer.
///
/// # Errors
///
/// A structural error when the template lacks its container, header or
/// footer; an IO error when a fragment cannot be read.
pub fn assemble(
    template_text: &str,
    fragments: &[Fragment],
    markup: &MarkupConfig,
) -> Result<Advisory<String>> {
    let skeleton = Skeleton::parse(template_text, markup)?;
    let removed = skeleton.clear_stale(markup);
    if removed > 0 {
        debug!("Removed {} stale blocks", removed);
    }

    let mut warnings = Vec::new();
    let block = markup.block();
    for fragment in fragments {
        info!("Inserting fragment: {}", fragment.path.display());
        let extracted = extract::extract(&fragment.path, &block)?;
        warnings.extend(extracted.warnings);
        for content in extracted.value {
            skeleton.insert(content);
        }
    }

    Ok(Advisory {
        value: skeleton.render()?,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{JoinError, Warning};
    use crate::extract::extract_blocks;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<!DOCTYPE html><html><head><title>T</title></head><body>\
        <div class=\"container\">\
        <header class=\"card\"><h1>Intro</h1></header>\
        <footer><p>end</p></footer>\
        </div></body></html>";

    fn cards(text: &str) -> Vec<ContentBlock> {
        extract_blocks(text, &MarkupConfig::default().block())
    }

    fn block_texts(page: &str) -> Vec<String> {
        let document = Document::parse(page);
        let markup = MarkupConfig::default();
        let container =
            dom::find_first(&document.root(), &markup.container()).unwrap();
        let texts = container
            .children
            .borrow()
            .iter()
            .map(|child| {
                let tag = dom::tag_name(child).unwrap_or_default();
                format!("{}:{}", tag, dom::text_content(child))
            })
            .collect();
        texts
    }

    fn write_fragment(dir: &Path, name: &str, body: &str) -> Fragment {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        let (start, end) = crate::fragment::parse_range(name).unwrap();
        Fragment { start, end, path }
    }

    #[test]
    fn test_blocks_land_between_header_and_footer() {
        let page = splice(
            TEMPLATE,
            cards(
                "<section class=\"card\">A</section>\
                 <section class=\"card\">B</section>",
            ),
            &MarkupConfig::default(),
        )
        .unwrap();
        assert_eq!(
            block_texts(&page),
            vec!["header:Intro", "section:A", "section:B", "footer:end"]
        );
        assert!(page.contains("<title>T</title>"));
    }

    #[test]
    fn test_stale_direct_children_removed() {
        let template = TEMPLATE.replace(
            "<footer>",
            "<section class=\"card\">stale</section>\
             <div><section class=\"card\">kept</section></div><footer>",
        );
        let page = splice(
            &template,
            cards("<section class=\"card\">new</section>"),
            &MarkupConfig::default(),
        )
        .unwrap();
        assert_eq!(
            block_texts(&page),
            vec!["header:Intro", "div:kept", "section:new", "footer:end"]
        );
    }

    #[test]
    fn test_reassembling_output_is_idempotent() {
        let markup = MarkupConfig::default();
        let fragment = "<section class=\"card\">A</section>";
        let first = splice(TEMPLATE, cards(fragment), &markup).unwrap();
        let second = splice(&first, cards(fragment), &markup).unwrap();
        let third = splice(TEMPLATE, cards(fragment), &markup).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_structural_errors() {
        let markup = MarkupConfig::default();
        let cases = [
            ("<div><header class=\"card\"></header><footer></footer></div>",
             StructuralError::MissingContainer),
            ("<div class=\"container\"><header></header><footer></footer></div>",
             StructuralError::MissingHeader),
            ("<div class=\"container\"><header class=\"card\"></header></div><footer></footer>",
             StructuralError::MissingFooter),
        ];
        for (template, expected) in cases {
            match splice(template, Vec::new(), &markup) {
                Err(JoinError::Structural(found)) => assert_eq!(found, expected),
                other => panic!("unexpected result for {template}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_assemble_reads_fragments_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let fragments = vec![
            write_fragment(dir, "1.html", "<section class=\"card\">A</section>"),
            write_fragment(dir, "2.html", "<p>nothing</p>"),
            write_fragment(
                dir,
                "3-4.html",
                "<section class=\"card\">B</section><section class=\"card\">C</section>",
            ),
        ];

        let assembled =
            assemble(TEMPLATE, &fragments, &MarkupConfig::default()).unwrap();
        assert_eq!(
            block_texts(&assembled.value),
            vec![
                "header:Intro",
                "section:A",
                "section:B",
                "section:C",
                "footer:end"
            ]
        );
        assert_eq!(
            assembled.warnings,
            vec![Warning::EmptyFragment {
                path: dir.join("2.html")
            }]
        );
    }
}
