//! Fade-in for visualization images.

use fraudscope_ui::style::trim_float;
use fraudscope_ui::{Document, ElementId, Selector};

use crate::config::ImageConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::visibility::EffectContext;

/// Hides images until they have loaded.
#[derive(Debug)]
pub struct ImageFade {
    images: Selector,
    duration_ms: u64,
}

impl ImageFade {
    /// Creates the subscriber from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the image selector does not parse.
    pub fn new(config: &ImageConfig) -> FxResult<Self> {
        Ok(Self {
            images: Selector::parse(&config.selector)?,
            duration_ms: config.duration_ms,
        })
    }

    /// Hides every image that is still loading and sets up the transition.
    ///
    /// Returns the number of images prepared.
    pub fn prepare(&self, document: &mut Document) -> usize {
        #[allow(clippy::cast_precision_loss)]
        let transition = format!("opacity {}s ease", trim_float(self.duration_ms as f32 / 1000.0));
        let images = document.select_all(&self.images);
        for &image in &images {
            if let Some(el) = document.get_mut(image) {
                el.style.set("opacity", "0");
                el.style.set("transition", transition.as_str());
                if el.is_complete() {
                    el.style.set("opacity", "1");
                }
            }
        }
        images.len()
    }

    fn reveal(&self, document: &mut Document, image: ElementId) {
        if !self.images.matches(document, image) {
            return;
        }
        if let Some(el) = document.get_mut(image) {
            el.style.set("opacity", "1");
        }
    }
}

impl Subscriber for ImageFade {
    fn name(&self) -> &'static str {
        "image-fade"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        if let PageEvent::ImageLoaded(image) = *event {
            self.reveal(ctx.document, image);
        }
        Ok(Propagation::Continue)
    }
}
