//! Cluster table row nudge.

use fraudscope_ui::style::px;
use fraudscope_ui::Selector;

use crate::config::RowHoverConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::visibility::EffectContext;

/// Shifts table rows right while hovered.
#[derive(Debug)]
pub struct RowHover {
    rows: Selector,
    shift_px: f32,
}

impl RowHover {
    /// Creates the subscriber from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the row selector does not parse.
    pub fn new(config: &RowHoverConfig) -> FxResult<Self> {
        Ok(Self {
            rows: Selector::parse(&config.selector)?,
            shift_px: config.shift_px,
        })
    }
}

impl Subscriber for RowHover {
    fn name(&self) -> &'static str {
        "row-hover"
    }

    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation> {
        let (row, offset) = match *event {
            PageEvent::PointerEnter(row) => (row, px(self.shift_px)),
            PageEvent::PointerLeave(row) => (row, "0".to_string()),
            _ => return Ok(Propagation::Continue),
        };
        if !self.rows.matches(ctx.document, row) {
            return Ok(Propagation::Continue);
        }
        if let Some(el) = ctx.document.get_mut(row) {
            el.style.set("transform", format!("translateX({offset})"));
        }
        Ok(Propagation::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use fraudscope_ui::Document;

    #[test]
    fn test_enter_and_leave() {
        let mut doc = Document::default();
        let table = doc.append_new(doc.body(), "table", "cluster-table").unwrap();
        let thead = doc.append_new(table, "thead", "").unwrap();
        let header = doc.append_new(thead, "tr", "").unwrap();
        let tbody = doc.append_new(table, "tbody", "").unwrap();
        let row = doc.append_new(tbody, "tr", "").unwrap();

        let mut scheduler = Scheduler::new();
        let mut hover = RowHover::new(&RowHoverConfig::default()).unwrap();
        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);

        hover.on_event(&PageEvent::PointerEnter(row), &mut ctx).unwrap();
        hover.on_event(&PageEvent::PointerEnter(header), &mut ctx).unwrap();
        assert_eq!(ctx.document.get(row).unwrap().style.get("transform"), Some("translateX(5px)"));
        assert_eq!(ctx.document.get(header).unwrap().style.get("transform"), None);

        hover.on_event(&PageEvent::PointerLeave(row), &mut ctx).unwrap();
        assert_eq!(ctx.document.get(row).unwrap().style.get("transform"), Some("translateX(0)"));
    }
}
