//! Progress bar replay.
//!
//! Each time a card scrolls into view its bars empty and then grow back to
//! their authored width, driven by the CSS width transition.

use std::collections::HashMap;

use fraudscope_ui::{Document, ElementId, Selector};

use crate::config::BarsConfig;
use crate::error::FxResult;
use crate::scheduler::TaskControl;
use crate::visibility::{Effect, EffectContext};

/// Empties a card's bars and refills them after a short delay.
#[derive(Debug, Clone)]
pub struct BarFill {
    fill_selector: Selector,
    delay_ms: u64,
    /// Authored width per fill, captured the first time the card is seen.
    widths: HashMap<ElementId, String>,
}

impl BarFill {
    /// Creates the effect from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the fill selector does not parse.
    pub fn new(config: &BarsConfig) -> FxResult<Self> {
        Ok(Self {
            fill_selector: Selector::parse(&config.fill_selector)?,
            delay_ms: config.delay_ms,
            widths: HashMap::new(),
        })
    }

    /// Recorded authored width of a fill.
    #[must_use]
    pub fn recorded_width(&self, fill: ElementId) -> Option<&str> {
        self.widths.get(&fill).map(String::as_str)
    }

    fn width_of(&self, fill: ElementId, document: &Document) -> Option<String> {
        if let Some(width) = self.widths.get(&fill) {
            return Some(width.clone());
        }
        document
            .get(fill)
            .and_then(|el| el.style.get("width"))
            .map(str::to_string)
    }
}

impl Effect for BarFill {
    fn name(&self) -> &'static str {
        "bar-fill"
    }

    fn applicable(&self, element: ElementId, document: &Document) -> bool {
        document
            .select_within(element, &self.fill_selector)
            .into_iter()
            .any(|fill| self.width_of(fill, document).is_some())
    }

    fn apply(&mut self, element: ElementId, ctx: &mut EffectContext<'_>) -> FxResult<()> {
        for fill in ctx.document.select_within(element, &self.fill_selector) {
            let Some(width) = self.width_of(fill, ctx.document) else {
                continue;
            };
            self.widths.entry(fill).or_insert_with(|| width.clone());

            if let Some(el) = ctx.document.get_mut(fill) {
                el.style.set("width", "0");
            }
            ctx.scheduler.schedule_once(self.delay_ms, move |document| {
                if let Some(el) = document.get_mut(fill) {
                    el.style.set("width", width.as_str());
                }
                Ok(TaskControl::Stop)
            });
        }
        Ok(())
    }
}
