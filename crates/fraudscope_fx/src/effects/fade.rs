//! Section fade-in.

use fraudscope_ui::style::{px, trim_float};
use fraudscope_ui::{Document, ElementId};

use crate::config::FadeConfig;
use crate::error::FxResult;
use crate::visibility::{Effect, EffectContext};

/// Slides a section up into place and fades it in.
#[derive(Debug, Clone)]
pub struct FadeIn {
    offset_px: f32,
    duration_ms: u64,
}

impl FadeIn {
    /// Creates the effect from config.
    #[must_use]
    pub fn new(config: &FadeConfig) -> Self {
        Self {
            offset_px: config.offset_px,
            duration_ms: config.duration_ms,
        }
    }

    /// Puts a section in its hidden starting state.
    pub fn prepare(&self, document: &mut Document, section: ElementId) {
        let Some(el) = document.get_mut(section) else {
            return;
        };
        #[allow(clippy::cast_precision_loss)]
        let seconds = trim_float(self.duration_ms as f32 / 1000.0);
        el.style.set("opacity", "0");
        el.style.set("transform", format!("translateY({})", px(self.offset_px)));
        el.style.set(
            "transition",
            format!("opacity {seconds}s ease, transform {seconds}s ease"),
        );
    }
}

impl Effect for FadeIn {
    fn name(&self) -> &'static str {
        "fade-in"
    }

    fn apply(&mut self, element: ElementId, ctx: &mut EffectContext<'_>) -> FxResult<()> {
        if let Some(el) = ctx.document.get_mut(element) {
            el.style.set("opacity", "1");
            el.style.set("transform", "translateY(0)");
        }
        Ok(())
    }
}
