//! Ring cursor that follows the pointer.

use fraudscope_ui::style::px;
use fraudscope_ui::{Color, Document, ElementId, Rect, Style, Theme, UiResult};

use crate::config::CursorConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::visibility::EffectContext;

/// Class of the cursor element.
pub const CURSOR_CLASS: &str = "custom-cursor";

/// Draws a ring under the pointer. Created on the first move.
#[derive(Debug)]
pub struct CustomCursor {
    size_px: f32,
    ring: Color,
    cursor: Option<ElementId>,
}

impl CustomCursor {
    /// Creates the subscriber from config.
    #[must_use]
    pub fn new(config: &CursorConfig) -> Self {
        Self {
            size_px: config.size_px,
            ring: Theme::report().accent.with_alpha(0.5),
            cursor: None,
        }
    }

    /// The cursor element, once created.
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.cursor
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        style.set("width", px(self.size_px));
        style.set("height", px(self.size_px));
        style.set("border", format!("2px solid {}", self.ring.to_css()));
        style.set("border-radius", "50%");
        style.set("position", "fixed");
        style.set("pointer-events", "none");
        style.set("z-index", "9999");
        style.set("transition", "all 0.15s ease");
        style.set("mix-blend-mode", "difference");
        style
    }

    /// Returns the live cursor element, creating it if needed.
    fn ensure(&mut self, document: &mut Document) -> UiResult<ElementId> {
        if let Some(cursor) = self.cursor.filter(|&id| document.is_connected(id)) {
            return Ok(cursor);
        }
        let body = document.body();
        let cursor = document.append_new(body, "div", CURSOR_CLASS)?;
        if let Some(el) = document.get_mut(cursor) {
            el.style = self.style();
        }
        self.cursor = Some(cursor);
        Ok(cursor)
    }
}

impl Subscriber for CustomCursor {
    fn name(&self) -> &'static str {
        "custom-cursor"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        let PageEvent::PointerMove { x, y } = *event else {
            return Ok(Propagation::Continue);
        };
        let cursor = self.ensure(ctx.document)?;

        let half = self.size_px / 2.0;
        let (left, top) = (x - half, y - half);
        let (doc_x, doc_y) = ctx.document.viewport().to_document(left, top);
        if let Some(el) = ctx.document.get_mut(cursor) {
            el.style.set("left", px(left));
            el.style.set("top", px(top));
            el.rect = Rect::new(doc_x, doc_y, self.size_px, self.size_px);
        }
        Ok(Propagation::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;

    #[test]
    fn test_single_cursor_follows_pointer() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let mut cursor = CustomCursor::new(&CursorConfig::default());
        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);

        cursor.on_event(&PageEvent::PointerMove { x: 100.0, y: 50.0 }, &mut ctx).unwrap();
        cursor.on_event(&PageEvent::PointerMove { x: 300.0, y: 200.0 }, &mut ctx).unwrap();

        let cursors = ctx.document.query_selector_all(".custom-cursor").unwrap();
        assert_eq!(cursors.len(), 1);
        let style = &ctx.document.get(cursors[0]).unwrap().style;
        assert_eq!(style.get("left"), Some("290px"));
        assert_eq!(style.get("top"), Some("190px"));
        assert_eq!(style.get("position"), Some("fixed"));
        assert_eq!(style.get("border"), Some("2px solid rgba(102, 126, 234, 0.5)"));
    }

    #[test]
    fn test_cursor_recreated_after_removal() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let mut cursor = CustomCursor::new(&CursorConfig::default());

        cursor
            .on_event(&PageEvent::PointerMove { x: 1.0, y: 1.0 }, &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();
        let first = cursor.element().unwrap();
        doc.remove(first);
        cursor
            .on_event(&PageEvent::PointerMove { x: 2.0, y: 2.0 }, &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();

        assert_ne!(cursor.element(), Some(first));
        assert_eq!(doc.query_selector_all(".custom-cursor").unwrap().len(), 1);
    }
}
