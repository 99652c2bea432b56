//! Block bootstrap: discovery, dispatch and status markers.
//!
//! A block is an element whose first class names a known decorator
//! (`<div class="carousel">`). Decoration marks the block the same way
//! every time:
//!
//! | Attribute | Value |
//! |-----------|-------|
//! | `class` | `block` added |
//! | `data-block-name` | the block name |
//! | `data-block-status` | `loading` while the decorator runs, then `loaded` |

use crate::banner;
use crate::carousel::{self, Carousel};
use crate::config::BlockConfig;
use crate::dom::{Document, DomError, NodeId};
use crate::picture::PictureOptimizer;
use serde::Serialize;
use thiserror::Error;

pub const BLOCK_CLASS: &str = "block";
pub const NAME_ATTR: &str = "data-block-name";
pub const STATUS_ATTR: &str = "data-block-status";

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("no decorator for block '{0}'")]
    UnknownBlock(String),
    #[error(transparent)]
    Dom(#[from] DomError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Carousel,
    Banner,
}

impl BlockKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "carousel" => Some(BlockKind::Carousel),
            "banner" => Some(BlockKind::Banner),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Carousel => "carousel",
            BlockKind::Banner => "banner",
        }
    }

    /// Kind named by the first class of `node`, if any.
    pub fn of(doc: &Document, node: NodeId) -> Option<Self> {
        doc.element(node)?.classes().next().and_then(Self::from_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Loading,
    Loaded,
}

impl BlockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockStatus::Loading => "loading",
            BlockStatus::Loaded => "loaded",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "loading" => Some(BlockStatus::Loading),
            "loaded" => Some(BlockStatus::Loaded),
            _ => None,
        }
    }
}

/// Collaborators shared by every decorator.
#[derive(Clone, Copy)]
pub struct BlockContext<'a> {
    pub config: &'a BlockConfig,
    pub optimizer: &'a dyn PictureOptimizer,
}

impl<'a> BlockContext<'a> {
    pub fn new(config: &'a BlockConfig, optimizer: &'a dyn PictureOptimizer) -> Self {
        Self { config, optimizer }
    }
}

#[derive(Debug, Clone)]
pub enum DecoratedBlock {
    Carousel(Carousel),
    /// The banner's wrapper element.
    Banner(NodeId),
}

impl DecoratedBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            DecoratedBlock::Carousel(_) => BlockKind::Carousel,
            DecoratedBlock::Banner(_) => BlockKind::Banner,
        }
    }

    pub fn as_carousel(&self) -> Option<&Carousel> {
        match self {
            DecoratedBlock::Carousel(carousel) => Some(carousel),
            DecoratedBlock::Banner(_) => None,
        }
    }

    pub fn as_carousel_mut(&mut self) -> Option<&mut Carousel> {
        match self {
            DecoratedBlock::Carousel(carousel) => Some(carousel),
            DecoratedBlock::Banner(_) => None,
        }
    }

    /// Summary for hosts that bridge block state out of the document.
    pub fn report(&self, doc: &Document, node: NodeId) -> BlockReport {
        let (slides, navigation) = match self {
            DecoratedBlock::Carousel(carousel) => (carousel.total(), !carousel.is_static()),
            DecoratedBlock::Banner(_) => (0, false),
        };
        BlockReport {
            name: self.kind(),
            status: doc.attr(node, STATUS_ATTR).and_then(BlockStatus::parse),
            slides,
            navigation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    pub name: BlockKind,
    pub status: Option<BlockStatus>,
    pub slides: usize,
    pub navigation: bool,
}

impl BlockReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decorate one block element.
pub fn decorate_block(
    doc: &mut Document,
    node: NodeId,
    ctx: &BlockContext<'_>,
) -> Result<DecoratedBlock, BlockError> {
    let element = doc.element(node).ok_or(BlockError::NotAnElement(node))?;
    let kind = match element.classes().next() {
        Some(name) => {
            BlockKind::from_name(name).ok_or_else(|| BlockError::UnknownBlock(name.to_string()))?
        }
        None => return Err(BlockError::UnknownBlock(String::new())),
    };

    doc.add_class(node, BLOCK_CLASS)?;
    doc.set_attr(node, NAME_ATTR, kind.name())?;
    doc.set_attr(node, STATUS_ATTR, BlockStatus::Loading.as_str())?;

    let decorated = match kind {
        BlockKind::Carousel => DecoratedBlock::Carousel(carousel::decorate(
            doc,
            node,
            &ctx.config.carousel,
            ctx.optimizer,
        )?),
        BlockKind::Banner => DecoratedBlock::Banner(banner::decorate(doc, node)?),
    };

    doc.set_attr(node, STATUS_ATTR, BlockStatus::Loaded.as_str())?;
    tracing::debug!(block = kind.name(), "block loaded");
    Ok(decorated)
}

/// Decorate every known block under the document root, in document order.
///
/// Returns each block element with its handle.
pub fn decorate_blocks(
    doc: &mut Document,
    ctx: &BlockContext<'_>,
) -> Result<Vec<(NodeId, DecoratedBlock)>, BlockError> {
    let candidates: Vec<NodeId> = doc
        .descendants(doc.root())
        .filter(|&node| BlockKind::of(doc, node).is_some())
        .collect();

    let mut decorated = Vec::with_capacity(candidates.len());
    for node in candidates {
        if !doc.is_connected(node) || doc.attr(node, STATUS_ATTR).is_some() {
            tracing::trace!(?node, "skipping block");
            continue;
        }
        decorated.push((node, decorate_block(doc, node, ctx)?));
    }
    tracing::debug!(blocks = decorated.len(), "decorated document");
    Ok(decorated)
}
