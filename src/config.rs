//! Block configuration.
//!
//! Parses and validates block settings from TOML text. Every key has a
//! default, so a host only has to name the values it changes. Reading the
//! text from disk or the network is left to the host.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [carousel]
//! image_width = 750            # Breakpoint width requested for slide images
//! eager_images = false         # Force eager loading of slide images
//! visibility_threshold = 0.5   # Share of a slide that must be visible to count as current
//! boundary = "clamp"           # "clamp" or "wrap" at the first/last slide
//!
//! [carousel.scroll]
//! behavior = "smooth"          # "smooth", "instant" or "auto"
//! block = "nearest"            # "start", "center", "end" or "nearest"
//! inline = "start"
//!
//! [images]
//! base_url = "http://localhost/"   # Base for resolving relative image sources
//! optimize = "medium"              # Value of the optimize= query parameter
//! webp = true                      # Offer WebP sources ahead of the fallback
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only switch to cyclic navigation
//! [carousel]
//! boundary = "wrap"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::carousel::{BoundaryPolicy, ScrollIntoView};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration shared by all blocks on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockConfig {
    /// Carousel behaviour.
    pub carousel: CarouselConfig,
    /// Settings for the standard picture optimizer.
    pub images: ImagesConfig,
}

impl BlockConfig {
    /// Parse settings from TOML text and validate them.
    ///
    /// Missing keys and sections take their defaults; unknown ones are
    /// rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.image_width == 0 {
            return Err(ConfigError::Validation(
                "carousel.image_width must be greater than 0".into(),
            ));
        }
        let threshold = self.carousel.visibility_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "carousel.visibility_threshold must be in (0, 1]".into(),
            ));
        }
        if let Err(err) = url::Url::parse(&self.images.base_url) {
            return Err(ConfigError::Validation(format!(
                "images.base_url must be an absolute URL: {err}"
            )));
        }
        if self.images.optimize.trim().is_empty() {
            return Err(ConfigError::Validation(
                "images.optimize must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Carousel behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Width of the single breakpoint requested for slide images.
    pub image_width: u32,
    /// Ask the optimizer for eager loading. Off: slides are usually above the fold.
    pub eager_images: bool,
    /// Minimum visible share of a slide for the observer to make it current.
    pub visibility_threshold: f64,
    /// What prev/next do at the ends of the slide list.
    pub boundary: BoundaryPolicy,
    /// Options for the scroll transition of explicit requests.
    pub scroll: ScrollIntoView,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            image_width: 750,
            eager_images: false,
            visibility_threshold: 0.5,
            boundary: BoundaryPolicy::Clamp,
            scroll: ScrollIntoView::default(),
        }
    }
}

/// Settings for [`QueryStringOptimizer`](crate::picture::QueryStringOptimizer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Base URL relative image sources are resolved against.
    pub base_url: String,
    /// Value of the `optimize` query parameter.
    pub optimize: String,
    /// Emit `image/webp` sources ahead of the original format.
    pub webp: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            optimize: "medium".to_string(),
            webp: true,
        }
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Page Blocks Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Carousel
# ---------------------------------------------------------------------------
[carousel]
# Width (px) of the single breakpoint requested for every slide image.
image_width = 750

# Force eager image loading. Slides are usually above the fold, so the
# optimizer's default (lazy) is kept.
eager_images = false

# Share of a slide (0-1] that must be visible inside the slide strip before
# it becomes the current slide after a swipe or scroll.
visibility_threshold = 0.5

# What previous/next do at the ends: "clamp" stays put, "wrap" cycles.
boundary = "clamp"

# Scroll transition used when a slide is selected with the controls.
[carousel.scroll]
behavior = "smooth"   # smooth | instant | auto
block = "nearest"     # start | center | end | nearest
inline = "start"      # start | center | end | nearest

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Base URL relative image sources are resolved against.
base_url = "http://localhost/"

# Value of the optimize= query parameter sent to the image service.
optimize = "medium"

# Offer image/webp sources ahead of the original format.
webp = true
"##
}
