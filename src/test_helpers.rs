//! Shared test utilities for the block test suites.
//!
//! Provides markup builders for authored blocks, lookups that panic with a
//! clear message on a miss, and recording collaborators that stand in for
//! the host's scroll machinery and image optimizer.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let html = carousel_markup(&[
//!     vec![image_cell("/a.jpg", "A"), text_cell("First")],
//!     vec![text_cell("Second")],
//! ]);
//! let (mut doc, block) = block_of(&html);
//!
//! let next = find_by_class(&doc, block, "carousel-next");
//! ```

use std::cell::RefCell;

use crate::carousel::{Navigation, ScrollHost, ScrollIntoView};
use crate::dom::{Document, NodeId};
use crate::picture::{PictureError, PictureOptimizer, PictureRequest};

// =========================================================================
// Markup builders
// =========================================================================

/// An authored carousel block: one `<div>` row per entry, cells verbatim.
pub fn carousel_markup(rows: &[Vec<String>]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| format!("<div>{}</div>", cells.concat()))
        .collect();
    format!(r#"<div class="carousel">{rows}</div>"#)
}

/// A cell holding a single picture, the way authoring tools wrap it.
pub fn image_cell(src: &str, alt: &str) -> String {
    format!(r#"<div><picture><img src="{src}" alt="{alt}"></picture></div>"#)
}

/// A body cell with a heading.
pub fn text_cell(text: &str) -> String {
    format!("<div><h2>{text}</h2></div>")
}

/// Parse `html` and return the document with its first top-level element.
pub fn block_of(html: &str) -> (Document, NodeId) {
    let doc = Document::parse_fragment(html).unwrap();
    let block = doc
        .first_element_child(doc.root())
        .unwrap_or_else(|| panic!("no element in fragment: {html}"));
    (doc, block)
}

// =========================================================================
// Lookups: panic with a clear message on a miss
// =========================================================================

/// First descendant of `scope` carrying `class`. Panics if not found.
pub fn find_by_class(doc: &Document, scope: NodeId, class: &str) -> NodeId {
    doc.descendants_by_class(scope, class)
        .next()
        .unwrap_or_else(|| {
            panic!(
                "no element with class '{class}' under:\n{}",
                doc.outer_html(scope)
            )
        })
}

/// First descendant `<tag>` of `scope`. Panics if not found.
pub fn find_by_tag(doc: &Document, scope: NodeId, tag: &str) -> NodeId {
    doc.descendants_by_tag(scope, tag).next().unwrap_or_else(|| {
        panic!(
            "no <{tag}> under:\n{}",
            doc.outer_html(scope)
        )
    })
}

/// Indices of the dots currently marked active.
pub fn active_dots(doc: &Document, navigation: &Navigation) -> Vec<usize> {
    navigation
        .dots()
        .iter()
        .filter(|dot| doc.has_class(dot.node, crate::carousel::ACTIVE_CLASS))
        .map(|dot| dot.index)
        .collect()
}

// =========================================================================
// Recording collaborators
// =========================================================================

/// Scroll host that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingScroll {
    pub requests: Vec<(NodeId, ScrollIntoView)>,
}

impl RecordingScroll {
    pub fn targets(&self) -> Vec<NodeId> {
        self.requests.iter().map(|(target, _)| *target).collect()
    }
}

impl ScrollHost for RecordingScroll {
    fn scroll_into_view(&mut self, target: NodeId, options: &ScrollIntoView) {
        self.requests.push((target, *options));
    }
}

/// Optimizer that records requests and returns `<picture class="optimized">`.
#[derive(Debug, Default)]
pub struct RecordingOptimizer {
    requests: RefCell<Vec<PictureRequest>>,
}

impl RecordingOptimizer {
    pub fn requests(&self) -> Vec<PictureRequest> {
        self.requests.borrow().clone()
    }
}

impl PictureOptimizer for RecordingOptimizer {
    fn optimize(
        &self,
        doc: &mut Document,
        request: &PictureRequest,
    ) -> Result<NodeId, PictureError> {
        self.requests.borrow_mut().push(request.clone());
        let picture = doc.create_element_with_class("picture", "optimized");
        let img = doc.create_element("img");
        doc.set_attr(img, "src", &request.src)?;
        doc.set_attr(img, "alt", &request.alt)?;
        doc.append(picture, img)?;
        Ok(picture)
    }
}
