//! Responsive picture rewriting.
//!
//! Authored content arrives with plain `<picture><img src=…></picture>`
//! markup. Before a block is shown, every such picture is swapped for an
//! optimized, responsive variant produced by a [`PictureOptimizer`].
//!
//! The optimizer is a collaborator: how it chooses formats and sizes is its
//! own policy. Blocks only describe *what* they need through a
//! [`PictureRequest`] (source, alt text, loading hint, breakpoints).
//!
//! [`QueryStringOptimizer`] is the standard implementation. It targets an
//! image service that resizes on the fly from query parameters:
//!
//! ```text
//! <picture>
//!   <source type="image/webp" srcset="/media/hero.jpg?width=750&format=webply&optimize=medium">
//!   <img loading="lazy" alt="Hero" src="/media/hero.jpg?width=750&format=jpg&optimize=medium">
//! </picture>
//! ```
//!
//! With several breakpoints, every breakpoint gets a WebP `<source>`, every
//! breakpoint but the last gets a fallback `<source>`, and the last one
//! becomes the `<img>`.

use crate::config::ImagesConfig;
use crate::dom::{Document, DomError, NodeId};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum PictureError {
    #[error("Invalid image source '{src}': {source}")]
    InvalidSource {
        src: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Image source has no file extension: {0}")]
    NoExtension(String),
    #[error("At least one breakpoint is required")]
    NoBreakpoints,
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

/// One responsive size the optimizer should offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    /// Media condition for this size, e.g. `(min-width: 600px)`.
    pub media: Option<String>,
    /// Requested rendering width in pixels.
    pub width: u32,
}

impl Breakpoint {
    pub fn width(width: u32) -> Self {
        Self { media: None, width }
    }

    pub fn with_media(media: &str, width: u32) -> Self {
        Self {
            media: Some(media.to_string()),
            width,
        }
    }
}

/// Everything an optimizer needs to build a replacement `<picture>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureRequest {
    pub src: String,
    pub alt: String,
    /// Load immediately instead of lazily.
    pub eager: bool,
    pub breakpoints: Vec<Breakpoint>,
    /// Intrinsic `(width, height)` from the source `<img>`, when it declares both.
    pub dimensions: Option<(u32, u32)>,
}

impl PictureRequest {
    /// Build a request from an authored `<img>`.
    pub fn from_img(doc: &Document, img: NodeId, eager: bool, breakpoints: &[Breakpoint]) -> Self {
        let dimension = |name: &str| doc.attr(img, name).and_then(|v| v.trim().parse::<u32>().ok());
        Self {
            src: doc.attr(img, "src").unwrap_or_default().to_string(),
            alt: doc.attr(img, "alt").unwrap_or_default().to_string(),
            eager,
            breakpoints: breakpoints.to_vec(),
            dimensions: dimension("width").zip(dimension("height")),
        }
    }
}

/// Collaborator that turns an image reference into a detached `<picture>`.
///
/// Implementations create the replacement inside `doc` and return its id;
/// the caller is responsible for putting it in place.
pub trait PictureOptimizer {
    fn optimize(&self, doc: &mut Document, request: &PictureRequest)
    -> Result<NodeId, PictureError>;
}

/// Optimizer for image services that resize from query parameters.
#[derive(Debug, Clone)]
pub struct QueryStringOptimizer {
    base: Url,
    optimize: String,
    webp: bool,
}

impl QueryStringOptimizer {
    pub fn new(base: Url, optimize: &str, webp: bool) -> Self {
        Self {
            base,
            optimize: optimize.to_string(),
            webp,
        }
    }

    pub fn from_config(config: &ImagesConfig) -> Result<Self, PictureError> {
        let base = Url::parse(&config.base_url).map_err(|source| PictureError::InvalidSource {
            src: config.base_url.clone(),
            source,
        })?;
        Ok(Self::new(base, &config.optimize, config.webp))
    }

    fn variant_url(&self, path: &str, width: u32, format: &str) -> String {
        format!(
            "{path}?width={width}&format={format}&optimize={}",
            self.optimize
        )
    }
}

impl PictureOptimizer for QueryStringOptimizer {
    fn optimize(
        &self,
        doc: &mut Document,
        request: &PictureRequest,
    ) -> Result<NodeId, PictureError> {
        let Some((last, leading)) = request.breakpoints.split_last() else {
            return Err(PictureError::NoBreakpoints);
        };
        let url = self
            .base
            .join(&request.src)
            .map_err(|source| PictureError::InvalidSource {
                src: request.src.clone(),
                source,
            })?;
        let path = url.path();
        let ext = match path.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() && !ext.contains('/') => ext,
            _ => return Err(PictureError::NoExtension(request.src.clone())),
        };

        let picture = doc.create_element("picture");

        if self.webp {
            for breakpoint in &request.breakpoints {
                let source = doc.create_element("source");
                if let Some(media) = &breakpoint.media {
                    doc.set_attr(source, "media", media)?;
                }
                doc.set_attr(source, "type", "image/webp")?;
                doc.set_attr(
                    source,
                    "srcset",
                    &self.variant_url(path, breakpoint.width, "webply"),
                )?;
                doc.append(picture, source)?;
            }
        }

        for breakpoint in leading {
            let source = doc.create_element("source");
            if let Some(media) = &breakpoint.media {
                doc.set_attr(source, "media", media)?;
            }
            doc.set_attr(source, "srcset", &self.variant_url(path, breakpoint.width, ext))?;
            doc.append(picture, source)?;
        }

        let img = doc.create_element("img");
        doc.set_attr(img, "loading", if request.eager { "eager" } else { "lazy" })?;
        doc.set_attr(img, "alt", &request.alt)?;
        doc.set_attr(img, "src", &self.variant_url(path, last.width, ext))?;
        if let Some((width, height)) = request.dimensions {
            doc.set_attr(img, "width", &width.to_string())?;
            doc.set_attr(img, "height", &height.to_string())?;
        }
        doc.append(picture, img)?;

        Ok(picture)
    }
}

/// Replace every `picture > img` under `scope` with an optimized picture.
///
/// Pictures the optimizer rejects are left untouched. Returns how many
/// pictures were replaced.
pub fn optimize_pictures(
    doc: &mut Document,
    scope: NodeId,
    optimizer: &dyn PictureOptimizer,
    eager: bool,
    breakpoints: &[Breakpoint],
) -> usize {
    let images: Vec<NodeId> = doc
        .descendants_by_tag(scope, "img")
        .filter(|&img| doc.parent(img).is_some_and(|p| doc.is_tag(p, "picture")))
        .collect();

    let mut replaced = 0;
    for img in images {
        // A picture holding two images disappears with the first replacement.
        if doc.is_removed(img) {
            continue;
        }
        let Some(picture) = doc.parent(img) else {
            continue;
        };
        let request = PictureRequest::from_img(doc, img, eager, breakpoints);
        let result = optimizer
            .optimize(doc, &request)
            .and_then(|node| doc.replace_with(picture, node).map_err(PictureError::from));
        match result {
            Ok(()) => replaced += 1,
            Err(err) => {
                tracing::warn!(src = %request.src, error = %err, "keeping original picture");
            }
        }
    }
    tracing::debug!(replaced, "optimized pictures");
    replaced
}
