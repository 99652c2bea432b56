//! Headless scroll viewport.
//!
//! A geometry-only stand-in for a browser scroll container: slides sit side
//! by side at a fixed width, and the viewport shows a window of them. It
//! implements [`ScrollHost`] and produces the [`IntersectionEntry`] batches a
//! browser would, so the whole carousel can be driven without one.
//!
//! Records are queued once for every slide when the viewport is created,
//! and afterwards whenever a slide crosses the threshold in either
//! direction. Smooth scrolls complete immediately.

use super::{Carousel, IntersectionEntry, ScrollHost, ScrollIntoView, ScrollLogicalPosition};
use crate::dom::NodeId;

#[derive(Debug, Clone)]
pub struct HeadlessViewport {
    slides: Vec<NodeId>,
    viewport_width: f64,
    slide_width: f64,
    threshold: f64,
    scroll_x: f64,
    above: Vec<bool>,
    records: Vec<IntersectionEntry>,
    requests: Vec<(NodeId, ScrollIntoView)>,
}

impl HeadlessViewport {
    pub fn new(slides: Vec<NodeId>, viewport_width: f64, slide_width: f64, threshold: f64) -> Self {
        let mut viewport = Self {
            above: vec![false; slides.len()],
            slides,
            viewport_width,
            slide_width,
            threshold,
            scroll_x: 0.0,
            records: Vec::new(),
            requests: Vec::new(),
        };
        for index in 0..viewport.slides.len() {
            let entry = viewport.entry(index);
            viewport.above[index] = entry.satisfies(threshold);
            viewport.records.push(entry);
        }
        viewport
    }

    /// Full-width slides for `carousel`, at its observer threshold.
    pub fn for_carousel(carousel: &Carousel, viewport_width: f64) -> Self {
        let threshold = carousel
            .observer()
            .map_or(super::DEFAULT_THRESHOLD, |o| o.threshold());
        let slides = carousel.slides().iter().map(|s| s.node).collect();
        Self::new(slides, viewport_width, viewport_width, threshold)
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn max_scroll(&self) -> f64 {
        (self.slides.len() as f64 * self.slide_width - self.viewport_width).max(0.0)
    }

    /// Move the viewport, as a user swipe would.
    pub fn scroll_to(&mut self, x: f64) {
        self.scroll_x = x.clamp(0.0, self.max_scroll());
        for index in 0..self.slides.len() {
            let entry = self.entry(index);
            let above = entry.satisfies(self.threshold);
            if above != self.above[index] {
                self.above[index] = above;
                self.records.push(entry);
            }
        }
    }

    /// Bring slide `index` flush with the left edge.
    pub fn swipe_to(&mut self, index: usize) {
        self.scroll_to(index as f64 * self.slide_width);
    }

    /// Drain queued intersection records.
    pub fn take_records(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.records)
    }

    /// Every scroll request received, oldest first.
    pub fn scroll_requests(&self) -> &[(NodeId, ScrollIntoView)] {
        &self.requests
    }

    /// Visible share of slide `index`.
    pub fn ratio(&self, index: usize) -> f64 {
        if self.slide_width <= 0.0 {
            return 0.0;
        }
        let (left, right) = self.bounds(index);
        let visible = right.min(self.scroll_x + self.viewport_width) - left.max(self.scroll_x);
        (visible.max(0.0) / self.slide_width).min(1.0)
    }

    fn bounds(&self, index: usize) -> (f64, f64) {
        let left = index as f64 * self.slide_width;
        (left, left + self.slide_width)
    }

    fn entry(&self, index: usize) -> IntersectionEntry {
        let ratio = self.ratio(index);
        IntersectionEntry {
            target: self.slides[index],
            intersection_ratio: ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}

impl ScrollHost for HeadlessViewport {
    fn scroll_into_view(&mut self, target: NodeId, options: &ScrollIntoView) {
        self.requests.push((target, *options));
        let Some(index) = self.slides.iter().position(|&s| s == target) else {
            return;
        };
        let (left, right) = self.bounds(index);
        let x = match options.inline {
            ScrollLogicalPosition::Start => left,
            ScrollLogicalPosition::End => right - self.viewport_width,
            ScrollLogicalPosition::Center => {
                left + self.slide_width / 2.0 - self.viewport_width / 2.0
            }
            ScrollLogicalPosition::Nearest => {
                if left >= self.scroll_x && right <= self.scroll_x + self.viewport_width {
                    self.scroll_x
                } else if left < self.scroll_x {
                    left
                } else {
                    right - self.viewport_width
                }
            }
        };
        self.scroll_to(x);
    }
}
