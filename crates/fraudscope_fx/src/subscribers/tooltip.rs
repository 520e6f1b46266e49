//! Metric tooltips on hover.

use fraudscope_ui::{Selector, TooltipConfig, TooltipManager};

use crate::config::MetricTooltipConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::visibility::EffectContext;

/// Shows an anchor's `title` in a floating box while it is hovered.
#[derive(Debug)]
pub struct MetricTooltips {
    anchors: Selector,
    manager: TooltipManager,
}

impl MetricTooltips {
    /// Creates the subscriber from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the anchor selector does not parse.
    pub fn new(config: &MetricTooltipConfig) -> FxResult<Self> {
        let boxes = TooltipConfig {
            gap: config.gap_px,
            ..TooltipConfig::default()
        };
        Ok(Self {
            anchors: Selector::parse(&config.selector)?,
            manager: TooltipManager::new(boxes),
        })
    }

    /// Boxes currently shown.
    #[must_use]
    pub fn manager(&self) -> &TooltipManager {
        &self.manager
    }
}

impl Subscriber for MetricTooltips {
    fn name(&self) -> &'static str {
        "metric-tooltips"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        match *event {
            PageEvent::PointerEnter(anchor) if self.anchors.matches(ctx.document, anchor) => {
                self.manager.prune(ctx.document);
                self.manager.show(ctx.document, anchor)?;
            }
            PageEvent::PointerLeave(anchor) => {
                self.manager.hide(ctx.document, anchor);
                self.manager.prune(ctx.document);
            }
            _ => {}
        }
        Ok(Propagation::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use fraudscope_ui::{Document, Rect};

    #[test]
    fn test_box_follows_hover() {
        let mut doc = Document::default();
        let anchor = doc.append_new(doc.body(), "span", "metric-tooltip").unwrap();
        let el = doc.get_mut(anchor).unwrap();
        el.rect = Rect::new(900.0, 200.0, 16.0, 16.0);
        el.set_attribute("title", "Share of points in their majority class");
        let plain = doc.append_new(doc.body(), "span", "").unwrap();
        doc.get_mut(plain).unwrap().set_attribute("title", "not a metric");

        let mut scheduler = Scheduler::new();
        let mut tooltips = MetricTooltips::new(&MetricTooltipConfig::default()).unwrap();
        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);

        tooltips.on_event(&PageEvent::PointerEnter(plain), &mut ctx).unwrap();
        assert_eq!(tooltips.manager().active_count(), 0);

        tooltips.on_event(&PageEvent::PointerEnter(anchor), &mut ctx).unwrap();
        let tip = tooltips.manager().box_for(anchor).unwrap();
        assert!(ctx.document.get(tip).unwrap().has_class("tooltip-box"));
        assert_eq!(ctx.document.get(tip).unwrap().rect.right(), 890.0);

        tooltips.on_event(&PageEvent::PointerLeave(anchor), &mut ctx).unwrap();
        assert!(!ctx.document.contains(tip));
        assert_eq!(tooltips.manager().active_count(), 0);
    }
}
