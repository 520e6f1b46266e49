//! Click ripples.

use fraudscope_ui::style::{px, trim_float};
use fraudscope_ui::{Color, Document, MouseButton, Rect, Style, Theme, UiResult};

use crate::config::RippleConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::scheduler::TaskControl;
use crate::visibility::EffectContext;

/// DOM id of the keyframes element.
pub const RIPPLE_STYLE_ID: &str = "ripple-style";

/// Class of ripple elements.
pub const RIPPLE_CLASS: &str = "ripple";

/// Spawns an expanding circle at every click.
#[derive(Debug)]
pub struct Ripple {
    size_px: f32,
    scale: f32,
    duration_ms: u64,
    fill: Color,
}

impl Ripple {
    /// Creates the subscriber from config.
    #[must_use]
    pub fn new(config: &RippleConfig) -> Self {
        Self {
            size_px: config.size_px,
            scale: config.scale,
            duration_ms: config.duration_ms,
            fill: Theme::report().accent.with_alpha(0.3),
        }
    }

    /// Adds the keyframes to `head` unless already there.
    fn install_keyframes(&self, document: &mut Document) -> UiResult<()> {
        if document.element_by_dom_id(RIPPLE_STYLE_ID).is_some() {
            return Ok(());
        }
        let head = document.head();
        let style = document.append_new(head, "style", "")?;
        if let Some(el) = document.get_mut(style) {
            el.set_attribute("id", RIPPLE_STYLE_ID);
            el.text = format!(
                "@keyframes rippleEffect {{ to {{ transform: scale({}); opacity: 0; }} }}",
                trim_float(self.scale)
            );
        }
        tracing::trace!("ripple keyframes installed");
        Ok(())
    }

    fn style(&self, left: f32, top: f32) -> Style {
        #[allow(clippy::cast_precision_loss)]
        let seconds = trim_float(self.duration_ms as f32 / 1000.0);
        let mut style = Style::new();
        style.set("position", "fixed");
        style.set("width", px(self.size_px));
        style.set("height", px(self.size_px));
        style.set("border-radius", "50%");
        style.set("background", self.fill.to_css());
        style.set("pointer-events", "none");
        style.set("z-index", "9998");
        style.set("animation", format!("rippleEffect {seconds}s ease-out"));
        style.set("left", px(left));
        style.set("top", px(top));
        style
    }
}

impl Subscriber for Ripple {
    fn name(&self) -> &'static str {
        "ripple"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        let PageEvent::Click {
            x,
            y,
            button: MouseButton::Left,
        } = *event
        else {
            return Ok(Propagation::Continue);
        };

        self.install_keyframes(ctx.document)?;

        let half = self.size_px / 2.0;
        let (left, top) = (x - half, y - half);
        let (doc_x, doc_y) = ctx.document.viewport().to_document(left, top);
        let body = ctx.document.body();
        let ripple = ctx.document.append_new(body, "div", RIPPLE_CLASS)?;
        if let Some(el) = ctx.document.get_mut(ripple) {
            el.style = self.style(left, top);
            el.rect = Rect::new(doc_x, doc_y, self.size_px, self.size_px);
        }

        ctx.scheduler.schedule_once(self.duration_ms, move |document| {
            document.remove(ripple);
            Ok(TaskControl::Stop)
        });
        Ok(Propagation::Continue)
    }
}
