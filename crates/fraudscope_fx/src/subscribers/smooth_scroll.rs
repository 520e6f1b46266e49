//! Smooth scrolling for in-page links.

use fraudscope_ui::{Animation, Document, Easing, ElementId, MouseButton, Selector};

use crate::config::ScrollConfig;
use crate::error::FxResult;
use crate::events::{PageEvent, Propagation, Subscriber};
use crate::scheduler::{TaskControl, TaskId};
use crate::visibility::EffectContext;

/// Takes over clicks on `#fragment` links and eases the target to the top
/// of the viewport.
#[derive(Debug)]
pub struct SmoothScroll {
    anchors: Selector,
    duration_ms: u64,
    frame_ms: u64,
    easing: Easing,
    active: Option<TaskId>,
}

impl SmoothScroll {
    /// Creates the subscriber from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the anchor selector does not parse.
    pub fn new(config: &ScrollConfig) -> FxResult<Self> {
        Ok(Self {
            anchors: Selector::parse(&config.anchor_selector)?,
            duration_ms: config.duration_ms,
            frame_ms: config.frame_ms.max(1),
            easing: config.easing,
            active: None,
        })
    }

    /// Task driving the current scroll, if one was started.
    #[must_use]
    pub fn active_task(&self) -> Option<TaskId> {
        self.active
    }

    /// Link under a client position: the hit element or its closest
    /// matching ancestor.
    fn anchor_at(&self, document: &Document, x: f32, y: f32) -> Option<ElementId> {
        let (dx, dy) = document.viewport().to_document(x, y);
        let hit = document.hit_test(dx, dy)?;
        std::iter::once(hit)
            .chain(document.ancestors(hit))
            .find(|&id| self.anchors.matches(document, id))
    }

    /// Element a link points at.
    fn destination(document: &Document, anchor: ElementId) -> Option<ElementId> {
        let href = document.get(anchor)?.attribute("href")?;
        let fragment = href.strip_prefix('#')?;
        if fragment.is_empty() {
            return None;
        }
        document.element_by_dom_id(fragment)
    }

    fn scroll_to_element(&mut self, target: ElementId, ctx: &mut EffectContext<'_>) {
        let Some(top) = ctx.document.get(target).map(|el| el.rect.y) else {
            return;
        };
        if let Some(previous) = self.active.take() {
            ctx.scheduler.cancel(previous);
        }

        let (_, max_y) = ctx.document.max_scroll();
        let destination = top.clamp(0.0, max_y);
        let start = ctx.document.viewport().scroll_y;

        #[allow(clippy::cast_precision_loss)]
        let mut animation = Animation::new(start, self.easing).with_duration(self.duration_ms as f32);
        animation.set_target(destination);
        if animation.is_complete() {
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let step = self.frame_ms as f32;
        let task = ctx.scheduler.schedule_repeating(self.frame_ms, move |document| {
            animation.update(step);
            let x = document.viewport().scroll_x;
            document.scroll_to(x, animation.value());
            Ok(if animation.is_complete() {
                TaskControl::Stop
            } else {
                TaskControl::Continue
            })
        });
        tracing::debug!(from = start, to = destination, task = task.raw(), "smooth scroll started");
        self.active = Some(task);
    }
}

impl Subscriber for SmoothScroll {
    fn name(&self) -> &'static str {
        "smooth-scroll"
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
        let Some(anchor) = self.anchor_at(ctx.document, x, y) else {
            return Ok(Propagation::Continue);
        };

        if let Some(target) = Self::destination(ctx.document, anchor) {
            self.scroll_to_element(target, ctx);
        }
        Ok(Propagation::DefaultPrevented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;
    use fraudscope_ui::Rect;

    fn page() -> (Document, ElementId) {
        let mut doc = Document::default();
        let body = doc.body();
        doc.get_mut(body).unwrap().rect = Rect::new(0.0, 0.0, 1280.0, 3000.0);
        let nav = doc.append_new(body, "nav", "").unwrap();
        doc.get_mut(nav).unwrap().rect = Rect::new(0.0, 0.0, 1280.0, 60.0);
        let link = doc.append_new(nav, "a", "").unwrap();
        let el = doc.get_mut(link).unwrap();
        el.rect = Rect::new(100.0, 10.0, 80.0, 40.0);
        el.set_attribute("href", "#clusters");
        let section = doc.append_new(body, "section", "content-section").unwrap();
        let el = doc.get_mut(section).unwrap();
        el.rect = Rect::new(0.0, 1400.0, 1280.0, 600.0);
        el.set_attribute("id", "clusters");
        (doc, link)
    }

    #[test]
    fn test_click_on_link_scrolls_to_target() {
        let (mut doc, _) = page();
        let mut scheduler = Scheduler::new();
        let mut scroll = SmoothScroll::new(&ScrollConfig::default()).unwrap();

        let outcome = scroll
            .on_event(&PageEvent::click(120.0, 20.0), &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();
        assert_eq!(outcome, Propagation::DefaultPrevented);
        assert_eq!(doc.viewport().scroll_y, 0.0);

        scheduler.advance(300, &mut doc);
        let midway = doc.viewport().scroll_y;
        assert!(midway > 0.0 && midway < 1400.0);

        scheduler.advance(1000, &mut doc);
        assert_eq!(doc.viewport().scroll_y, 1400.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_missing_target_prevents_default_only() {
        let (mut doc, link) = page();
        doc.get_mut(link).unwrap().set_attribute("href", "#nowhere");
        let mut scheduler = Scheduler::new();
        let mut scroll = SmoothScroll::new(&ScrollConfig::default()).unwrap();

        let outcome = scroll
            .on_event(&PageEvent::click(120.0, 20.0), &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();
        assert_eq!(outcome, Propagation::DefaultPrevented);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_click_elsewhere_ignored() {
        let (mut doc, _) = page();
        let mut scheduler = Scheduler::new();
        let mut scroll = SmoothScroll::new(&ScrollConfig::default()).unwrap();

        let outcome = scroll
            .on_event(&PageEvent::click(600.0, 300.0), &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();
        assert_eq!(outcome, Propagation::Continue);
        assert!(scroll.active_task().is_none());
    }

    #[test]
    fn test_new_navigation_cancels_previous() {
        let (mut doc, _) = page();
        let mut scheduler = Scheduler::new();
        let mut scroll = SmoothScroll::new(&ScrollConfig::default()).unwrap();
        let click = PageEvent::click(120.0, 20.0);

        scroll.on_event(&click, &mut EffectContext::new(&mut doc, &mut scheduler)).unwrap();
        let first = scroll.active_task().unwrap();
        scheduler.advance(100, &mut doc);
        scroll.on_event(&click, &mut EffectContext::new(&mut doc, &mut scheduler)).unwrap();

        assert!(!scheduler.is_scheduled(first));
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_destination_clamped_to_extent() {
        let (mut doc, _) = page();
        let target = doc.element_by_dom_id("clusters").unwrap();
        doc.get_mut(target).unwrap().rect = Rect::new(0.0, 2800.0, 1280.0, 200.0);
        let mut scheduler = Scheduler::new();
        let mut scroll = SmoothScroll::new(&ScrollConfig::default()).unwrap();

        scroll
            .on_event(&PageEvent::click(120.0, 20.0), &mut EffectContext::new(&mut doc, &mut scheduler))
            .unwrap();
        scheduler.advance(2000, &mut doc);
        assert_eq!(doc.viewport().scroll_y, 3000.0 - 720.0);
    }
}
