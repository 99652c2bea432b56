//! Carousel block.
//!
//! [`decorate`] turns an authored carousel block into a scrollable slide
//! list with prev/next buttons and one dot per slide, and returns a
//! [`Carousel`] handle through which the host forwards clicks and
//! visibility observations.
//!
//! ```text
//! div.carousel
//! ├── div.carousel-slides
//! │   ├── div.carousel-slide  (image part first, then body cells)
//! │   └── ...
//! ├── button.carousel-prev    ‹
//! ├── button.carousel-next    ›
//! └── div.carousel-nav[role=tablist]
//!     └── button[role=tab]    one per slide, .active on the current one
//! ```
//!
//! Carousels with zero or one slide are static: the slide list is rendered
//! but no controls, navigation state or observer exist.

mod navigation;
mod observer;
mod slides;
mod viewport;

pub use navigation::{
    ACTIVE_CLASS, BoundaryPolicy, Control, Dot, NAV_CLASS, NEXT_CLASS, NEXT_LABEL, Navigation,
    NavigationState, PREV_CLASS, PREV_LABEL, ScrollBehavior, ScrollHost, ScrollIntoView,
    ScrollLogicalPosition,
};
pub use observer::{IntersectionEntry, ViewportObserver};
pub use slides::{BODY_CLASS, IMAGE_CLASS, SLIDE_CLASS, SLIDES_CLASS, Slide, SlideSet, build_slides};
pub use viewport::HeadlessViewport;

use crate::config::CarouselConfig;
use crate::dom::{Document, DomError, NodeId};
use crate::picture::{Breakpoint, PictureOptimizer, optimize_pictures};

/// Share of a slide that must be visible for it to become current.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
struct Controls {
    navigation: Navigation,
    observer: ViewportObserver,
}

/// A decorated carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    block: NodeId,
    slides_container: NodeId,
    slides: Vec<Slide>,
    controls: Option<Controls>,
}

/// Decorate `block` in place.
pub fn decorate(
    doc: &mut Document,
    block: NodeId,
    config: &CarouselConfig,
    optimizer: &dyn PictureOptimizer,
) -> Result<Carousel, DomError> {
    if doc.element(block).is_none() {
        return Err(DomError::NotAnElement(block));
    }

    let SlideSet { container, slides } = build_slides(doc, block)?;
    optimize_pictures(
        doc,
        container,
        optimizer,
        config.eager_images,
        &[Breakpoint::width(config.image_width)],
    );
    doc.append(block, container)?;

    let nodes: Vec<NodeId> = slides.iter().map(|s| s.node).collect();
    let controls = match Navigation::build(doc, block, &nodes, config)? {
        Some(navigation) => {
            let mut observer = ViewportObserver::new(container, config.visibility_threshold);
            for &slide in &nodes {
                observer.observe(slide);
            }
            Some(Controls {
                navigation,
                observer,
            })
        }
        None => None,
    };

    tracing::debug!(
        slides = slides.len(),
        interactive = controls.is_some(),
        "decorated carousel"
    );

    Ok(Carousel {
        block,
        slides_container: container,
        slides,
        controls,
    })
}

impl Carousel {
    pub fn block(&self) -> NodeId {
        self.block
    }

    pub fn slides_container(&self) -> NodeId {
        self.slides_container
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn total(&self) -> usize {
        self.slides.len()
    }

    /// Current slide; always 0 for a static carousel.
    pub fn current(&self) -> usize {
        self.controls
            .as_ref()
            .map_or(0, |c| c.navigation.current())
    }

    /// No controls were built (fewer than two slides).
    pub fn is_static(&self) -> bool {
        self.controls.is_none()
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        self.controls.as_ref().map(|c| &c.navigation)
    }

    pub fn observer(&self) -> Option<&ViewportObserver> {
        self.controls.as_ref().map(|c| &c.observer)
    }

    pub fn go_to(
        &mut self,
        doc: &mut Document,
        host: &mut dyn ScrollHost,
        index: usize,
    ) -> Result<usize, DomError> {
        match self.controls.as_mut() {
            Some(c) => c.navigation.go_to(doc, host, index),
            None => Ok(0),
        }
    }

    pub fn next(&mut self, doc: &mut Document, host: &mut dyn ScrollHost) -> Result<usize, DomError> {
        match self.controls.as_mut() {
            Some(c) => c.navigation.next(doc, host),
            None => Ok(0),
        }
    }

    pub fn prev(&mut self, doc: &mut Document, host: &mut dyn ScrollHost) -> Result<usize, DomError> {
        match self.controls.as_mut() {
            Some(c) => c.navigation.prev(doc, host),
            None => Ok(0),
        }
    }

    /// Dispatch a click on `target`. Clicks outside the controls are ignored.
    pub fn handle_click(
        &mut self,
        doc: &mut Document,
        host: &mut dyn ScrollHost,
        target: NodeId,
    ) -> Result<Option<Control>, DomError> {
        let Some(c) = self.controls.as_mut() else {
            return Ok(None);
        };
        let Some(control) = c.navigation.control_for(doc, target) else {
            tracing::trace!(?target, "click outside carousel controls");
            return Ok(None);
        };
        c.navigation.activate(doc, host, control)?;
        Ok(Some(control))
    }

    /// Deliver a batch of visibility observations.
    pub fn observe(
        &mut self,
        doc: &mut Document,
        entries: &[IntersectionEntry],
    ) -> Result<Option<usize>, DomError> {
        match self.controls.as_mut() {
            Some(c) => c.observer.deliver(doc, &mut c.navigation, entries),
            None => Ok(None),
        }
    }

    /// Disconnect the observer. The block stays rendered and clickable.
    pub fn teardown(&mut self) {
        if let Some(c) = self.controls.as_mut() {
            c.observer.disconnect();
            tracing::debug!(block = ?self.block, "carousel observer disconnected");
        }
    }
}
