//! Slide Builder.
//!
//! Turns the authored rows of a carousel block into slides. Each row's cells
//! are re-parented (moved, not copied) into a fresh `div.carousel-slide`:
//!
//! ```text
//! block                               .carousel-slides
//! ├── row                             ├── .carousel-slide
//! │   ├── cell  h2 + p       ──►      │   ├── cell.carousel-slide-image
//! │   └── cell  picture               │   └── cell.carousel-slide-body
//! └── row                             └── .carousel-slide
//!     └── cell  p                         └── cell.carousel-slide-body
//! ```
//!
//! The image part always comes first, whatever the authored order. Rows
//! are removed once emptied. Content never makes the builder fail: a row
//! without cells still yields a slide, just an empty one.

use crate::classify::is_image_only;
use crate::dom::{Document, DomError, NodeId};

pub const SLIDES_CLASS: &str = "carousel-slides";
pub const SLIDE_CLASS: &str = "carousel-slide";
pub const IMAGE_CLASS: &str = "carousel-slide-image";
pub const BODY_CLASS: &str = "carousel-slide-body";

/// One normalized slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// 0-based position; also the DOM order inside the slide list.
    pub index: usize,
    /// The `div.carousel-slide` element.
    pub node: NodeId,
    /// The image-only cell, if the row had one.
    pub image_part: Option<NodeId>,
    /// Remaining cells in authored order.
    pub body_part: Vec<NodeId>,
}

impl Slide {
    pub fn is_empty(&self) -> bool {
        self.image_part.is_none() && self.body_part.is_empty()
    }
}

/// Result of [`build_slides`]: a detached slide list and its slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSet {
    /// The detached `div.carousel-slides` element.
    pub container: NodeId,
    pub slides: Vec<Slide>,
}

/// Move every row of `block` into a slide inside a new, detached slide list.
///
/// The first image-only cell of a row becomes the slide's image part; any
/// further cells (including a second image-only one) join the body part.
pub fn build_slides(doc: &mut Document, block: NodeId) -> Result<SlideSet, DomError> {
    let container = doc.create_element_with_class("div", SLIDES_CLASS);
    let rows: Vec<NodeId> = doc.element_children(block).collect();
    let mut slides = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let node = doc.create_element_with_class("div", SLIDE_CLASS);
        let cells: Vec<NodeId> = doc.element_children(row).collect();
        let mut image_part = None;
        let mut body_part = Vec::new();

        for cell in cells {
            if image_part.is_none() && is_image_only(doc, cell) {
                doc.set_class_name(cell, IMAGE_CLASS)?;
                doc.prepend(node, cell)?;
                image_part = Some(cell);
            } else {
                doc.set_class_name(cell, BODY_CLASS)?;
                doc.append(node, cell)?;
                body_part.push(cell);
            }
        }

        doc.append(container, node)?;
        doc.remove(row);
        slides.push(Slide {
            index,
            node,
            image_part,
            body_part,
        });
    }

    Ok(SlideSet { container, slides })
}
