//! Hero background parallax.

use fraudscope_ui::style::px;
use fraudscope_ui::Selector;

use crate::config::ParallaxConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::visibility::EffectContext;

/// Moves the hero background at a fraction of the scroll speed.
#[derive(Debug)]
pub struct Parallax {
    layer: Selector,
    factor: f32,
}

impl Parallax {
    /// Creates the subscriber from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the layer selector does not parse.
    pub fn new(config: &ParallaxConfig) -> FxResult<Self> {
        Ok(Self {
            layer: Selector::parse(&config.selector)?,
            factor: config.factor,
        })
    }
}

impl Subscriber for Parallax {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        if !matches!(event, PageEvent::Scroll { .. }) {
            return Ok(Propagation::Continue);
        }
        let scrolled = ctx.document.viewport().scroll_y;
        let Some(layer) = ctx.document.select_all(&self.layer).into_iter().next() else {
            return Ok(Propagation::Continue);
        };
        if let Some(el) = ctx.document.get_mut(layer) {
            el.style.set("transform", format!("translateY({})", px(scrolled * self.factor)));
        }
        Ok(Propagation::Continue)
    }
}
