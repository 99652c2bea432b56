//! Banner block.
//!
//! A one-shot reshuffle with no runtime state. Authored rows hold a
//! heading, a description, call-to-action links and optionally an
//! illustration; the result is a single wrapper with a text column and an
//! image column:
//!
//! ```text
//! div.banner
//! └── div
//!     ├── div.banner-content
//!     │   ├── h1, p, ...            every element from the text rows
//!     │   └── div.banner-actions    all .button-wrapper elements, if any
//!     └── div.banner-image          the image-only cell, if any
//! ```

use crate::classify::is_image_only;
use crate::dom::{Document, DomError, NodeId};

pub const CONTENT_CLASS: &str = "banner-content";
pub const ACTIONS_CLASS: &str = "banner-actions";
pub const IMAGE_CLASS: &str = "banner-image";
const BUTTON_WRAPPER_CLASS: &str = "button-wrapper";

/// Decorate `block` in place and return the wrapper element.
pub fn decorate(doc: &mut Document, block: NodeId) -> Result<NodeId, DomError> {
    if doc.element(block).is_none() {
        return Err(DomError::NotAnElement(block));
    }

    let rows: Vec<NodeId> = doc.element_children(block).collect();

    // Last image-only leading cell wins.
    let image_cell = rows
        .iter()
        .rev()
        .filter_map(|&row| doc.first_element_child(row))
        .find(|&cell| is_image_only(doc, cell));

    let content = doc.create_element_with_class("div", CONTENT_CLASS);
    for &row in &rows {
        if image_cell.is_some() && doc.first_element_child(row) == image_cell {
            continue;
        }
        let cells: Vec<NodeId> = doc.element_children(row).collect();
        for cell in cells {
            let items: Vec<NodeId> = doc.element_children(cell).collect();
            for item in items {
                doc.append(content, item)?;
            }
        }
        doc.remove(row);
    }

    let buttons: Vec<NodeId> = doc
        .descendants_by_class(content, BUTTON_WRAPPER_CLASS)
        .collect();
    if !buttons.is_empty() {
        let actions = doc.create_element_with_class("div", ACTIONS_CLASS);
        for button in &buttons {
            doc.append(actions, *button)?;
        }
        doc.append(content, actions)?;
    }

    let wrapper = doc.create_element("div");
    doc.append(wrapper, content)?;
    if let Some(cell) = image_cell {
        doc.set_class_name(cell, IMAGE_CLASS)?;
        doc.append(wrapper, cell)?;
    }

    doc.clear_children(block);
    doc.append(block, wrapper)?;

    tracing::debug!(
        image = image_cell.is_some(),
        actions = buttons.len(),
        "decorated banner"
    );
    Ok(wrapper)
}
