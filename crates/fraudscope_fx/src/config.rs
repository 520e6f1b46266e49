//! # Effects Configuration
//!
//! Every tunable of the report page effects, loaded from TOML.
//!
//! Each field defaults to the value the page ships with, so an empty file
//! (or no file at all) reproduces the stock behavior:
//!
//! ```toml
//! [counter]
//! duration_ms = 1500
//!
//! [cursor]
//! enabled = false
//! ```

use std::path::Path;

use fraudscope_ui::{Easing, Margin, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};

/// Complete effects configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxConfig {
    /// Section fade-in on first view.
    pub fade: FadeConfig,
    /// Statistic counters.
    pub counter: CounterConfig,
    /// Progress and importance bars.
    pub bars: BarsConfig,
    /// Cluster table row hover.
    pub rows: RowHoverConfig,
    /// Metric tooltips.
    pub tooltip: MetricTooltipConfig,
    /// Hero background parallax.
    pub parallax: ParallaxConfig,
    /// Visualization image fade.
    pub images: ImageConfig,
    /// Custom pointer cursor.
    pub cursor: CursorConfig,
    /// Click ripples.
    pub ripple: RippleConfig,
    /// Smooth anchor scrolling.
    pub scroll: ScrollConfig,
    /// Startup banner.
    pub banner: BannerConfig,
}

impl FxConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::ConfigParse`] for malformed TOML or unknown keys,
    /// and the errors of [`FxConfig::validate`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> FxResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::ConfigIo`] if the file cannot be read, otherwise
    /// the errors of [`FxConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FxError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "effects config loaded");
        Ok(config)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// - [`FxError::InvalidThreshold`] for a threshold outside `(0, 1]`
    /// - [`FxError::Ui`] for a selector or root margin that does not parse
    /// - [`FxError::InvalidConfig`] for a zero duration or frame interval
    pub fn validate(&self) -> FxResult<()> {
        for threshold in [self.fade.threshold, self.counter.threshold, self.bars.threshold] {
            check_threshold(threshold)?;
        }
        for margin in [&self.fade.root_margin, &self.counter.root_margin, &self.bars.root_margin] {
            Margin::parse(margin)?;
        }
        for selector in [
            &self.fade.selector,
            &self.counter.selector,
            &self.counter.value_selector,
            &self.bars.selector,
            &self.bars.fill_selector,
            &self.rows.selector,
            &self.tooltip.selector,
            &self.parallax.selector,
            &self.images.selector,
            &self.scroll.anchor_selector,
        ] {
            Selector::parse(selector)?;
        }

        non_zero("counter.duration_ms", self.counter.duration_ms)?;
        non_zero("counter.frame_ms", self.counter.frame_ms)?;
        non_zero("scroll.frame_ms", self.scroll.frame_ms)?;
        if !self.parallax.factor.is_finite() {
            return Err(FxError::InvalidConfig("parallax.factor must be finite".into()));
        }
        if self.cursor.size_px <= 0.0 || self.ripple.size_px <= 0.0 {
            return Err(FxError::InvalidConfig("cursor and ripple sizes must be positive".into()));
        }
        Ok(())
    }
}

/// Validates a visibility threshold.
///
/// # Errors
///
/// Returns [`FxError::InvalidThreshold`] unless `0 < threshold <= 1`.
pub fn check_threshold(threshold: f32) -> FxResult<f32> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(FxError::InvalidThreshold(threshold))
    }
}

fn non_zero(name: &str, value: u64) -> FxResult<()> {
    if value == 0 {
        return Err(FxError::InvalidConfig(format!("{name} must be greater than zero")));
    }
    Ok(())
}

// =============================================================================
// VISIBILITY EFFECTS
// =============================================================================

/// Section fade-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FadeConfig {
    /// Whether the effect is installed.
    pub enabled: bool,
    /// Sections to fade in.
    pub selector: String,
    /// Visible fraction that triggers the fade.
    pub threshold: f32,
    /// Root margin, CSS shorthand.
    pub root_margin: String,
    /// Initial downward offset in pixels.
    pub offset_px: f32,
    /// CSS transition duration.
    pub duration_ms: u64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".content-section".into(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".into(),
            offset_px: 30.0,
            duration_ms: 800,
        }
    }
}

/// Statistic counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Whether the effect is installed.
    pub enabled: bool,
    /// Cards that hold a counter.
    pub selector: String,
    /// Node inside a card whose text is the value.
    pub value_selector: String,
    /// Visible fraction that starts the count.
    pub threshold: f32,
    /// Root margin, CSS shorthand.
    pub root_margin: String,
    /// Total count-up time.
    pub duration_ms: u64,
    /// Interval between displayed values.
    pub frame_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".stat-card".into(),
            value_selector: "h3".into(),
            threshold: 0.5,
            root_margin: "0px".into(),
            duration_ms: 2000,
            frame_ms: 16,
        }
    }
}

/// Progress and importance bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarsConfig {
    /// Whether the effect is installed.
    pub enabled: bool,
    /// Cards that hold bars.
    pub selector: String,
    /// Bar fills inside a card.
    pub fill_selector: String,
    /// Visible fraction that replays the fill.
    pub threshold: f32,
    /// Root margin, CSS shorthand.
    pub root_margin: String,
    /// Time the bar stays empty before refilling.
    pub delay_ms: u64,
}

impl Default for BarsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".metric-card, .feature-card".into(),
            fill_selector: ".metric-bar-fill, .importance-bar".into(),
            threshold: 0.3,
            root_margin: "0px".into(),
            delay_ms: 100,
        }
    }
}

// =============================================================================
// INPUT SUBSCRIBERS
// =============================================================================

/// Cluster table row hover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RowHoverConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Rows that shift on hover.
    pub selector: String,
    /// Horizontal shift while hovered.
    pub shift_px: f32,
}

impl Default for RowHoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".cluster-table tbody tr".into(),
            shift_px: 5.0,
        }
    }
}

/// Metric tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricTooltipConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Tooltip anchors. Their `title` attribute is the text.
    pub selector: String,
    /// Space between box and anchor.
    pub gap_px: f32,
}

impl Default for MetricTooltipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".metric-tooltip".into(),
            gap_px: 10.0,
        }
    }
}

/// Hero background parallax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Layer that moves.
    pub selector: String,
    /// Offset per scrolled pixel.
    pub factor: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".particles-bg".into(),
            factor: 0.5,
        }
    }
}

/// Visualization image fade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Images that fade in once loaded.
    pub selector: String,
    /// CSS transition duration.
    pub duration_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".viz-image".into(),
            duration_ms: 500,
        }
    }
}

/// Custom pointer cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Ring diameter.
    pub size_px: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size_px: 20.0,
        }
    }
}

/// Click ripples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RippleConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// Ripple diameter before it grows.
    pub size_px: f32,
    /// Scale reached at the end of the animation.
    pub scale: f32,
    /// Lifetime of a ripple element.
    pub duration_ms: u64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size_px: 50.0,
            scale: 4.0,
            duration_ms: 600,
        }
    }
}

/// Smooth anchor scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Whether the subscriber is installed.
    pub enabled: bool,
    /// In-page links.
    pub anchor_selector: String,
    /// Scroll animation length.
    pub duration_ms: u64,
    /// Interval between scroll steps.
    pub frame_ms: u64,
    /// Scroll curve.
    pub easing: Easing,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor_selector: "a[href^=\"#\"]".into(),
            duration_ms: 600,
            frame_ms: 16,
            easing: Easing::EaseInOut,
        }
    }
}

/// Startup banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    /// Whether the banner is logged.
    pub enabled: bool,
    /// First line.
    pub title: String,
    /// Second line.
    pub tagline: String,
    /// Third line.
    pub stack: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "🔍 DBSCAN Fraud Detection System".into(),
            tagline: "Built with ❤️ for bank fraud analysis".into(),
            stack: "⚡ Stack: Python, Flask, Scikit-learn, DBSCAN".into(),
        }
    }
}
