//! # Page Blocks
//!
//! Decorators that turn author-supplied, loosely structured block markup
//! into presentation widgets. Authors write plain rows and cells; the
//! decorators reshape them in place.
//!
//! # Architecture: Build Once, Then React
//!
//! ```text
//! 1. Parse     html       →  Document           (html5ever → arena)
//! 2. Decorate  block      →  reshaped subtree   (one-shot, per block)
//! 3. React     events     →  state + classes    (carousel only)
//! ```
//!
//! The banner stops after step 2. The carousel keeps a small state machine
//! alive: the current slide index, which drives the dots and is fed both by
//! control clicks and by visibility observations of the slide list.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Arena-backed document model, fragment parsing, HTML rendering through Maud |
//! | [`classify`] | The image-only cell rule shared by every block |
//! | [`picture`] | The image optimizer seam and the `picture > img` rewrite pass |
//! | [`carousel`] | Slide builder, navigation controller, viewport observer, headless viewport |
//! | [`banner`] | Banner layout: text column, actions row, image column |
//! | [`block`] | Block discovery, dispatch by name, status markers, JSON reports |
//! | [`config`] | Block settings parsed from TOML text, defaults, validation |
//!
//! # Design Decisions
//!
//! ## One Owner for the Current Slide
//!
//! Only the navigation controller writes the current index, through a
//! single setter that also recomputes every dot. The observer and the
//! controls *request* changes; they never touch the index or the dots.
//! This keeps "exactly one active dot" true after any sequence of events.
//!
//! ## Observed Requests Never Scroll
//!
//! A visibility observation means the user already scrolled. Answering it
//! with another scroll would re-trigger the observer and fight the user.
//! [`carousel::Navigation::observe_index`] does not even take a
//! [`carousel::ScrollHost`], so the feedback loop cannot be written.
//!
//! ## Host Effects Behind Traits
//!
//! Scrolling and image optimization belong to the host. They sit behind
//! [`carousel::ScrollHost`] and [`picture::PictureOptimizer`], so tests use
//! recording fakes and hosts without a layout engine can drive a carousel
//! with [`carousel::HeadlessViewport`].
//!
//! ## Content Never Fails
//!
//! Malformed rows degrade to empty slides, and pictures the optimizer
//! rejects keep their authored markup. Errors are reserved for host
//! misuse (decorating a node that is not an element) and for invalid
//! configuration.

pub mod banner;
pub mod block;
pub mod carousel;
pub mod classify;
pub mod config;
pub mod dom;
pub mod picture;

#[cfg(test)]
pub(crate) mod test_helpers;
