//! Navigation Controller.
//!
//! Owns the current slide index and keeps the controls in sync with it.
//!
//! ## Requests
//!
//! | Request | Source | Scrolls? |
//! |---------|--------|----------|
//! | explicit `go_to(i)` | dot click, host code | yes |
//! | relative `prev()` / `next()` | arrow buttons | yes |
//! | observed `observe_index(i)` | [`ViewportObserver`](super::ViewportObserver) | no |
//!
//! Observed requests never scroll: the user already moved the viewport, and a
//! second scroll would fire the observer again and fight the user.
//!
//! Every change of `current` goes through one private setter that clamps the
//! index and recomputes every dot's `active` class from scratch. Dots are a
//! projection of the index, never patched independently.

use crate::config::CarouselConfig;
use crate::dom::{Document, DomError, NodeId};
use serde::{Deserialize, Serialize};

pub const PREV_CLASS: &str = "carousel-prev";
pub const NEXT_CLASS: &str = "carousel-next";
pub const NAV_CLASS: &str = "carousel-nav";
pub const ACTIVE_CLASS: &str = "active";

pub const PREV_LABEL: &str = "Previous slide";
pub const NEXT_LABEL: &str = "Next slide";
const PREV_GLYPH: &str = "\u{2039}";
const NEXT_GLYPH: &str = "\u{203A}";

/// What relative and out-of-range explicit requests do at the ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Stay on the first/last slide.
    #[default]
    Clamp,
    /// Continue from the other end.
    Wrap,
}

impl BoundaryPolicy {
    /// Map a possibly out-of-range target onto `0..total`.
    pub fn resolve(self, target: isize, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let last = total - 1;
        match self {
            BoundaryPolicy::Clamp => {
                if target <= 0 {
                    0
                } else {
                    (target as usize).min(last)
                }
            }
            BoundaryPolicy::Wrap => target.rem_euclid(total as isize) as usize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollLogicalPosition {
    Start,
    Center,
    End,
    #[default]
    Nearest,
}

/// How a slide is brought into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollIntoView {
    pub behavior: ScrollBehavior,
    /// Vertical alignment. `Nearest` leaves the page alone when the strip is visible.
    pub block: ScrollLogicalPosition,
    /// Horizontal alignment inside the slide strip.
    pub inline: ScrollLogicalPosition,
}

impl Default for ScrollIntoView {
    fn default() -> Self {
        Self {
            behavior: ScrollBehavior::Smooth,
            block: ScrollLogicalPosition::Nearest,
            inline: ScrollLogicalPosition::Start,
        }
    }
}

/// The environment that performs scroll transitions.
///
/// Calls are fire-and-forget: a later request supersedes an earlier one
/// still in flight.
pub trait ScrollHost {
    fn scroll_into_view(&mut self, target: NodeId, options: &ScrollIntoView);
}

/// Current index and slide count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    current: usize,
    total: usize,
}

impl NavigationState {
    /// A state machine only exists for two or more slides.
    pub fn new(total: usize) -> Option<Self> {
        (total > 1).then_some(Self { current: 0, total })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Indicator button for one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub node: NodeId,
}

/// A control a click can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
    Dot(usize),
}

#[derive(Debug, Clone)]
pub struct Navigation {
    state: NavigationState,
    slides: Vec<NodeId>,
    dots: Vec<Dot>,
    prev_button: NodeId,
    next_button: NodeId,
    tablist: NodeId,
    policy: BoundaryPolicy,
    scroll: ScrollIntoView,
}

impl Navigation {
    /// Render the controls into `block` and start at slide 0.
    ///
    /// Returns `Ok(None)` for fewer than two slides; no controls are created.
    pub fn build(
        doc: &mut Document,
        block: NodeId,
        slides: &[NodeId],
        config: &CarouselConfig,
    ) -> Result<Option<Self>, DomError> {
        let Some(state) = NavigationState::new(slides.len()) else {
            return Ok(None);
        };

        let prev_button = control_button(doc, PREV_CLASS, PREV_LABEL, PREV_GLYPH)?;
        let next_button = control_button(doc, NEXT_CLASS, NEXT_LABEL, NEXT_GLYPH)?;
        doc.append(block, prev_button)?;
        doc.append(block, next_button)?;

        let tablist = doc.create_element_with_class("div", NAV_CLASS);
        doc.set_attr(tablist, "role", "tablist")?;
        let mut dots = Vec::with_capacity(slides.len());
        for index in 0..slides.len() {
            let node = doc.create_element("button");
            doc.set_attr(node, "aria-label", &format!("Slide {}", index + 1))?;
            doc.set_attr(node, "role", "tab")?;
            doc.append(tablist, node)?;
            dots.push(Dot { index, node });
        }
        doc.append(block, tablist)?;

        let navigation = Self {
            state,
            slides: slides.to_vec(),
            dots,
            prev_button,
            next_button,
            tablist,
            policy: config.boundary,
            scroll: config.scroll,
        };
        navigation.refresh_dots(doc)?;
        Ok(Some(navigation))
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn total(&self) -> usize {
        self.state.total
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn prev_button(&self) -> NodeId {
        self.prev_button
    }

    pub fn next_button(&self) -> NodeId {
        self.next_button
    }

    pub fn tablist(&self) -> NodeId {
        self.tablist
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Whether dot `index` is the active one.
    pub fn is_active(&self, index: usize) -> bool {
        index == self.state.current
    }

    /// Explicit request: select slide `index` and scroll it into view.
    pub fn go_to(
        &mut self,
        doc: &mut Document,
        host: &mut dyn ScrollHost,
        index: usize,
    ) -> Result<usize, DomError> {
        self.request(doc, host, isize::try_from(index).unwrap_or(isize::MAX))
    }

    pub fn next(&mut self, doc: &mut Document, host: &mut dyn ScrollHost) -> Result<usize, DomError> {
        self.request(doc, host, self.state.current as isize + 1)
    }

    pub fn prev(&mut self, doc: &mut Document, host: &mut dyn ScrollHost) -> Result<usize, DomError> {
        self.request(doc, host, self.state.current as isize - 1)
    }

    /// Observed request: adopt `index` without scrolling.
    pub fn observe_index(&mut self, doc: &mut Document, index: usize) -> Result<usize, DomError> {
        self.set_current(doc, index)
    }

    /// Perform whatever `control` stands for.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        host: &mut dyn ScrollHost,
        control: Control,
    ) -> Result<usize, DomError> {
        match control {
            Control::Prev => self.prev(doc, host),
            Control::Next => self.next(doc, host),
            Control::Dot(index) => self.go_to(doc, host, index),
        }
    }

    /// Resolve a click target (or one of its ancestors) to a control.
    pub fn control_for(&self, doc: &Document, target: NodeId) -> Option<Control> {
        let hit = doc.closest(target, |node| {
            node == self.prev_button
                || node == self.next_button
                || self.dots.iter().any(|dot| dot.node == node)
        })?;
        if hit == self.prev_button {
            Some(Control::Prev)
        } else if hit == self.next_button {
            Some(Control::Next)
        } else {
            self.dots
                .iter()
                .find(|dot| dot.node == hit)
                .map(|dot| Control::Dot(dot.index))
        }
    }

    fn request(
        &mut self,
        doc: &mut Document,
        host: &mut dyn ScrollHost,
        target: isize,
    ) -> Result<usize, DomError> {
        let index = self.policy.resolve(target, self.state.total);
        host.scroll_into_view(self.slides[index], &self.scroll);
        self.set_current(doc, index)
    }

    /// The only writer of `current`.
    fn set_current(&mut self, doc: &mut Document, index: usize) -> Result<usize, DomError> {
        let index = index.min(self.state.total - 1);
        if index != self.state.current {
            tracing::debug!(from = self.state.current, to = index, "carousel slide changed");
        }
        self.state.current = index;
        self.refresh_dots(doc)?;
        Ok(index)
    }

    fn refresh_dots(&self, doc: &mut Document) -> Result<(), DomError> {
        for dot in &self.dots {
            doc.toggle_class(dot.node, ACTIVE_CLASS, self.is_active(dot.index))?;
        }
        tracing::trace!(current = self.state.current, "dots refreshed");
        Ok(())
    }
}

fn control_button(
    doc: &mut Document,
    class_name: &str,
    label: &str,
    glyph: &str,
) -> Result<NodeId, DomError> {
    let button = doc.create_element_with_class("button", class_name);
    doc.set_attr(button, "aria-label", label)?;
    doc.set_text(button, glyph)?;
    Ok(button)
}
