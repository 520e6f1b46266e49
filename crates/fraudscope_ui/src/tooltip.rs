//! Metric tooltips.
//!
//! A tooltip is a real element appended to `body`, placed to the left of
//! its anchor and vertically centred on it. It lives exactly as long as
//! the pointer stays over the anchor.

use std::collections::HashMap;

use crate::document::Document;
use crate::element::ElementId;
use crate::error::{UiError, UiResult};
use crate::geometry::Rect;
use crate::style::{px, Color, Style, Theme};

/// Configuration for tooltip boxes.
#[derive(Debug, Clone, Copy)]
pub struct TooltipConfig {
    /// Background color.
    pub background: Color,
    /// Border color.
    pub border: Color,
    /// Text color.
    pub text: Color,
    /// Horizontal padding inside the box.
    pub padding_x: f32,
    /// Vertical padding inside the box.
    pub padding_y: f32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Estimated advance per character in pixels.
    pub char_width: f32,
    /// Space between the box and its anchor.
    pub gap: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        let theme = Theme::report();
        Self {
            background: theme.surface,
            border: theme.accent.with_alpha(0.3),
            text: theme.text,
            padding_x: 16.0,
            padding_y: 8.0,
            font_size: 14.0,
            char_width: 7.5,
            gap: 10.0,
        }
    }
}

impl TooltipConfig {
    /// Inline style block applied to every box.
    #[must_use]
    pub fn style(&self) -> Style {
        let mut style = Style::new();
        style.set("position", "absolute");
        style.set("background", self.background.to_css());
        style.set("color", self.text.to_css());
        style.set("padding", format!("{} {}", px(self.padding_y), px(self.padding_x)));
        style.set("border-radius", "0.5rem");
        style.set("font-size", px(self.font_size));
        style.set("z-index", "1000");
        style.set("pointer-events", "none");
        style.set("white-space", "nowrap");
        style.set("box-shadow", "0 4px 16px rgba(0, 0, 0, 0.3)");
        style.set("border", format!("1px solid {}", self.border.to_css()));
        style
    }

    /// Estimated box size for a single line of text.
    #[must_use]
    pub fn measure(&self, text: &str) -> (f32, f32) {
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f32;
        let width = chars * self.char_width + self.padding_x * 2.0 + 2.0;
        let height = self.font_size * 1.5 + self.padding_y * 2.0 + 2.0;
        (width, height)
    }
}

/// Manages tooltip boxes, at most one per anchor.
#[derive(Debug, Default)]
pub struct TooltipManager {
    /// Anchor → box element.
    boxes: HashMap<ElementId, ElementId>,
    config: TooltipConfig,
}

impl TooltipManager {
    /// Creates a manager with the given configuration.
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            boxes: HashMap::new(),
            config,
        }
    }

    /// Shows the tooltip for `anchor` from its `title` attribute.
    ///
    /// Returns the box element, or `None` when the anchor has no title.
    /// Showing an anchor that already has a box returns the existing box.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownElement`] if `anchor` is stale.
    pub fn show(&mut self, doc: &mut Document, anchor: ElementId) -> UiResult<Option<ElementId>> {
        let el = doc.get(anchor).ok_or(UiError::UnknownElement(anchor))?;
        let title = match el.attribute("title") {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => return Ok(None),
        };
        let anchor_rect = el.rect;

        if let Some(&existing) = self.boxes.get(&anchor) {
            if doc.contains(existing) {
                return Ok(Some(existing));
            }
        }

        let (width, height) = self.config.measure(&title);
        let left = anchor_rect.x - width - self.config.gap;
        let top = anchor_rect.y + anchor_rect.height / 2.0 - height / 2.0;

        let body = doc.body();
        let tip = doc.append_new(body, "div", "tooltip-box")?;
        if let Some(el) = doc.get_mut(tip) {
            el.text = title;
            el.style = self.config.style();
            el.style.set("left", px(left));
            el.style.set("top", px(top));
            el.rect = Rect::new(left, top, width, height);
        }

        self.boxes.insert(anchor, tip);
        tracing::debug!(anchor = anchor.raw(), "tooltip shown");
        Ok(Some(tip))
    }

    /// Removes the tooltip for `anchor`. Returns true if one was showing.
    pub fn hide(&mut self, doc: &mut Document, anchor: ElementId) -> bool {
        match self.boxes.remove(&anchor) {
            Some(tip) => doc.remove(tip),
            None => false,
        }
    }

    /// Returns the box currently shown for `anchor`.
    #[must_use]
    pub fn box_for(&self, anchor: ElementId) -> Option<ElementId> {
        self.boxes.get(&anchor).copied()
    }

    /// Number of boxes currently shown.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.boxes.len()
    }

    /// Removes boxes whose anchor no longer exists.
    pub fn prune(&mut self, doc: &mut Document) {
        let orphaned: Vec<_> = self
            .boxes
            .iter()
            .filter(|(anchor, _)| !doc.contains(**anchor))
            .map(|(&anchor, &tip)| (anchor, tip))
            .collect();
        for (anchor, tip) in orphaned {
            doc.remove(tip);
            self.boxes.remove(&anchor);
        }
    }
}
