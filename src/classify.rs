//! Structural classification of authored cells.
//!
//! Authors never declare what a cell is. A cell is treated as an *image
//! cell* purely by its shape, and both the carousel and the banner rely on
//! the same rule so images land where authors expect them.
//!
//! A cell is image-only when all of the following hold:
//!
//! 1. it contains a `<picture>` somewhere below it;
//! 2. it has exactly one element child;
//! 3. it has no non-whitespace text directly inside it;
//! 4. it has no `<p>` that lacks a `<picture>`.
//!
//! ```text
//! <div><p><picture>…</picture></p></div>               → Image
//! <div><picture>…</picture></div>                      → Image
//! <div><p><picture>…</picture></p><p>Caption</p></div> → Body  (two children)
//! <div><div><picture>…</picture><p>Caption</p></div></div> → Body  (text paragraph)
//! <div><h2>Title</h2></div>                            → Body  (no picture)
//! ```

use crate::dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Image,
    Body,
}

pub fn classify_cell(doc: &Document, cell: NodeId) -> CellKind {
    if is_image_only(doc, cell) {
        CellKind::Image
    } else {
        CellKind::Body
    }
}

/// Whether `cell` holds a picture and no other content.
pub fn is_image_only(doc: &Document, cell: NodeId) -> bool {
    if doc.descendants_by_tag(cell, "picture").next().is_none() {
        return false;
    }
    if doc.element_children(cell).count() != 1 {
        return false;
    }
    let stray_text = doc
        .children(cell)
        .any(|child| doc.text(child).is_some_and(|t| !t.trim().is_empty()));
    if stray_text {
        return false;
    }
    !doc
        .descendants_by_tag(cell, "p")
        .any(|p| doc.descendants_by_tag(p, "picture").next().is_none())
}
