//! # Report Page Tests
//!
//! The whole effects layer on the real report layout: scroll-driven
//! effects, pointer-driven subscribers, timers and the event queue.

use fraudscope_fx::fixture::{ReportPage, SECTION_IDS, STATS};
use fraudscope_fx::{
    EffectContext, FxConfig, FxError, FxResult, PageEvent, PageEventQueue, Propagation, ReportEffects, Subscriber,
};
use fraudscope_ui::{ElementId, MouseButton};

fn installed() -> (ReportEffects, ReportPageIds) {
    installed_with(&FxConfig::default())
}

fn installed_with(config: &FxConfig) -> (ReportEffects, ReportPageIds) {
    let page = ReportPage::build().unwrap();
    let ids = ReportPageIds::from(&page);
    let fx = ReportEffects::install(page.document, config).unwrap();
    (fx, ids)
}

/// Element handles copied out of the page before the document moves.
struct ReportPageIds {
    particles: ElementId,
    nav_links: Vec<ElementId>,
    sections: Vec<ElementId>,
    stat_values: Vec<ElementId>,
    metric_fills: Vec<ElementId>,
    tooltips: Vec<ElementId>,
    rows: Vec<ElementId>,
    images: Vec<ElementId>,
}

impl From<&ReportPage> for ReportPageIds {
    fn from(page: &ReportPage) -> Self {
        Self {
            particles: page.particles,
            nav_links: page.nav_links.clone(),
            sections: page.sections.clone(),
            stat_values: page.stat_values.clone(),
            metric_fills: page.metric_fills.clone(),
            tooltips: page.tooltips.clone(),
            rows: page.rows.clone(),
            images: page.images.clone(),
        }
    }
}

fn style<'a>(fx: &'a ReportEffects, id: ElementId, property: &str) -> Option<&'a str> {
    fx.document().get(id).and_then(|el| el.style.get(property))
}

fn text(fx: &ReportEffects, id: ElementId) -> String {
    fx.document().get(id).map(|el| el.text.clone()).unwrap_or_default()
}

fn scroll(fx: &mut ReportEffects, y: f32) {
    fx.handle(&PageEvent::Scroll { x: 0.0, y });
}

/// Test: install registers one target per section, stat card and bar card.
#[test]
fn test_install_registers_targets() {
    let (fx, ids) = installed();

    assert_eq!(fx.targets().fades.len(), SECTION_IDS.len());
    assert_eq!(fx.targets().counters.len(), STATS.len());
    assert_eq!(fx.targets().bars.len(), 3 + 4);
    assert_eq!(fx.runner().set_count(), 3);
    assert_eq!(fx.banner().len(), 3);
    assert_eq!(
        fx.subscriber_names(),
        vec!["smooth-scroll", "row-hover", "metric-tooltips", "parallax", "image-fade", "custom-cursor", "ripple"]
    );

    for &section in &ids.sections {
        assert_eq!(style(&fx, section, "opacity"), Some("0"));
        assert_eq!(style(&fx, section, "transform"), Some("translateY(30px)"));
    }
}

/// Test: sections stay hidden until scrolled into view.
#[test]
fn test_sections_fade_in_on_scroll() {
    let (mut fx, ids) = installed();

    assert_eq!(fx.start(), 0);
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("0"));

    scroll(&mut fx, 400.0);
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("1"));
    assert_eq!(style(&fx, ids.sections[0], "transform"), Some("translateY(0)"));
    assert_eq!(style(&fx, ids.sections[1], "opacity"), Some("0"));

    // Scrolling away does not hide it again.
    scroll(&mut fx, 3000.0);
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("1"));
}

/// Test: nothing happens before start.
#[test]
fn test_no_effects_before_start() {
    let (mut fx, ids) = installed();

    scroll(&mut fx, 400.0);
    fx.advance(3000);

    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("0"));
    assert_eq!(text(&fx, ids.stat_values[0]), "284,807");
    assert_eq!(fx.runner().stats().fired, 0);
}

/// Test: stat counters climb to their displayed values.
#[test]
fn test_counters_count_up() {
    let (mut fx, ids) = installed();
    fx.start();
    scroll(&mut fx, 400.0);

    assert_eq!(text(&fx, ids.stat_values[0]), "0");
    fx.advance(1000);
    let midway = text(&fx, ids.stat_values[0]);
    assert_ne!(midway, "0");
    assert_ne!(midway, "284,807");

    fx.advance(1100);
    for (&value, (_, expected)) in ids.stat_values.iter().zip(STATS) {
        assert_eq!(text(&fx, value), expected);
    }
    assert!(fx.targets().counters.iter().all(|&t| fx.runner().is_fired(t)));
}

/// Test: a stat card whose value is not a number is left alone.
#[test]
fn test_non_numeric_stat_skipped() {
    let (mut fx, ids) = installed();
    if let Some(el) = fx.document_mut().get_mut(ids.stat_values[1]) {
        el.text = "n/a".into();
    }
    fx.start();
    scroll(&mut fx, 400.0);
    fx.advance(2500);

    assert_eq!(text(&fx, ids.stat_values[1]), "n/a");
    assert_eq!(text(&fx, ids.stat_values[0]), "284,807");
    assert!(!fx.runner().is_fired(fx.targets().counters[1]));
    assert!(fx.runner().stats().skipped >= 1);
}

/// Test: bars empty and refill every time their card re-enters.
#[test]
fn test_bars_replay_on_reentry() {
    let (mut fx, ids) = installed();
    fx.start();
    let fill = ids.metric_fills[0];

    scroll(&mut fx, 1000.0);
    assert_eq!(style(&fx, fill, "width"), Some("0"));
    fx.advance(100);
    assert_eq!(style(&fx, fill, "width"), Some("71%"));

    // Still visible: no replay.
    scroll(&mut fx, 1010.0);
    assert_eq!(style(&fx, fill, "width"), Some("71%"));

    scroll(&mut fx, 0.0);
    scroll(&mut fx, 1000.0);
    assert_eq!(style(&fx, fill, "width"), Some("0"));
    fx.advance(100);
    assert_eq!(style(&fx, fill, "width"), Some("71%"));
}

/// Test: hovering a cluster row nudges it, leaving puts it back.
#[test]
fn test_row_hover() {
    let (mut fx, ids) = installed();
    fx.start();
    scroll(&mut fx, 1700.0);

    // First body row sits at document y 1864..1912.
    fx.handle(&PageEvent::PointerMove { x: 640.0, y: 180.0 });
    assert_eq!(style(&fx, ids.rows[0], "transform"), Some("translateX(5px)"));
    assert_eq!(style(&fx, ids.rows[1], "transform"), None);

    fx.handle(&PageEvent::PointerMove { x: 640.0, y: 215.0 });
    assert_eq!(style(&fx, ids.rows[0], "transform"), Some("translateX(0)"));
    assert_eq!(style(&fx, ids.rows[1], "transform"), Some("translateX(5px)"));
}

/// Test: the metric tooltip appears on hover and goes away on leave.
#[test]
fn test_tooltip_on_hover() {
    let (mut fx, ids) = installed();
    fx.start();
    scroll(&mut fx, 1000.0);

    let anchor = fx.document().client_rect(ids.tooltips[0]).unwrap();
    let (x, y) = anchor.center();
    fx.handle(&PageEvent::PointerMove { x, y });

    let boxes = fx.document().query_selector_all(".tooltip-box").unwrap();
    assert_eq!(boxes.len(), 1);
    let tip = fx.document().get(boxes[0]).unwrap();
    assert_eq!(tip.text, "Cohesion versus separation, -1 to 1");
    let anchor_doc = fx.document().get(ids.tooltips[0]).unwrap().rect;
    assert!(tip.rect.right() <= anchor_doc.x - 10.0 + 0.01);

    fx.handle(&PageEvent::PointerMove { x: 5.0, y: 5.0 });
    assert!(fx.document().query_selector_all(".tooltip-box").unwrap().is_empty());
}

/// Test: scrolling under a resting pointer updates hover too.
#[test]
fn test_scroll_moves_hover() {
    let (mut fx, ids) = installed();
    fx.start();
    scroll(&mut fx, 1700.0);
    fx.handle(&PageEvent::PointerMove { x: 640.0, y: 180.0 });
    assert_eq!(style(&fx, ids.rows[0], "transform"), Some("translateX(5px)"));

    scroll(&mut fx, 1748.0);
    assert_eq!(style(&fx, ids.rows[0], "transform"), Some("translateX(0)"));
    assert_eq!(style(&fx, ids.rows[1], "transform"), Some("translateX(5px)"));
}

/// Test: nav clicks smooth-scroll the section to the top and fade it in.
#[test]
fn test_nav_click_smooth_scrolls() {
    let (mut fx, ids) = installed();
    fx.start();

    let link = fx.document().client_rect(ids.nav_links[2]).unwrap();
    let (x, y) = link.center();
    assert_eq!(fx.handle(&PageEvent::click(x, y)), Propagation::DefaultPrevented);

    fx.advance(200);
    let partway = fx.document().viewport().scroll_y;
    assert!(partway > 0.0 && partway < 1720.0);

    for _ in 0..10 {
        fx.advance(100);
    }
    assert_eq!(fx.document().viewport().scroll_y, 1720.0);
    assert_eq!(style(&fx, ids.sections[2], "opacity"), Some("1"));
}

/// Test: clicks leave a ripple that expires; the keyframes stay.
#[test]
fn test_click_ripple() {
    let (mut fx, _) = installed();
    fx.start();

    assert_eq!(fx.handle(&PageEvent::click(900.0, 400.0)), Propagation::Continue);
    fx.handle(&PageEvent::click(100.0, 400.0));
    assert_eq!(fx.document().query_selector_all(".ripple").unwrap().len(), 2);
    assert_eq!(fx.document().query_selector_all("#ripple-style").unwrap().len(), 1);

    fx.advance(600);
    assert!(fx.document().query_selector_all(".ripple").unwrap().is_empty());
    assert!(fx.document().query_selector("#ripple-style").unwrap().is_some());
}

/// Test: the hero background moves at half the scroll speed.
#[test]
fn test_parallax() {
    let (mut fx, ids) = installed();
    fx.start();

    scroll(&mut fx, 300.0);
    assert_eq!(style(&fx, ids.particles, "transform"), Some("translateY(150px)"));
}

/// Test: loaded images show at once, the rest on their load event.
#[test]
fn test_image_fade() {
    let (mut fx, ids) = installed();
    assert_eq!(style(&fx, ids.images[0], "opacity"), Some("1"));
    assert_eq!(style(&fx, ids.images[3], "opacity"), Some("0"));

    fx.handle(&PageEvent::ImageLoaded(ids.images[3]));
    assert_eq!(style(&fx, ids.images[3], "opacity"), Some("1"));
}

/// Test: the custom cursor is created once and follows the pointer.
#[test]
fn test_custom_cursor() {
    let (mut fx, _) = installed();
    fx.handle(&PageEvent::PointerMove { x: 50.0, y: 60.0 });
    fx.handle(&PageEvent::PointerMove { x: 70.0, y: 80.0 });

    let cursors = fx.document().query_selector_all(".custom-cursor").unwrap();
    assert_eq!(cursors.len(), 1);
    assert_eq!(style(&fx, cursors[0], "left"), Some("60px"));
    assert_eq!(style(&fx, cursors[0], "top"), Some("70px"));
}

/// Test: disabled sections install nothing.
#[test]
fn test_disabled_sections() {
    let mut config = FxConfig::default();
    config.cursor.enabled = false;
    config.counter.enabled = false;
    let (mut fx, _) = installed_with(&config);

    assert!(!fx.subscriber_names().contains(&"custom-cursor"));
    assert!(fx.targets().counters.is_empty());
    fx.handle(&PageEvent::PointerMove { x: 50.0, y: 60.0 });
    assert!(fx.document().query_selector_all(".custom-cursor").unwrap().is_empty());
}

/// Test: bad configuration is rejected at install.
#[test]
fn test_bad_config_rejected() {
    let mut config = FxConfig::default();
    config.bars.threshold = 0.0;
    let page = ReportPage::build().unwrap();
    assert!(matches!(
        ReportEffects::install(page.document, &config),
        Err(FxError::InvalidThreshold(_))
    ));
}

/// Test: a failing subscriber does not stop the others.
#[test]
fn test_failing_subscriber_isolated() {
    struct Broken;
    impl Subscriber for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn on_event(&mut self, _: &PageEvent, _: &mut EffectContext<'_>) -> FxResult<Propagation> {
            Err(FxError::EffectFailed { effect: "broken", reason: "always".into() })
        }
    }

    let (mut fx, _) = installed();
    fx.add_subscriber(Broken);
    fx.handle(&PageEvent::click(300.0, 300.0));
    fx.handle(&PageEvent::click(300.0, 300.0));

    assert_eq!(fx.document().query_selector_all(".ripple").unwrap().len(), 2);
}

/// Test: events queued from another thread are handled in order.
#[test]
fn test_queue_from_host_thread() {
    let (mut fx, ids) = installed();
    fx.start();
    let queue = PageEventQueue::new(64);
    let sender = queue.sender();

    std::thread::spawn(move || {
        for y in [100.0, 200.0, 400.0] {
            assert!(sender.send(PageEvent::Scroll { x: 0.0, y }));
        }
    })
    .join()
    .unwrap();

    assert_eq!(fx.drain(&queue), 3);
    assert_eq!(fx.document().viewport().scroll_y, 400.0);
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("1"));
}

/// Test: removing a section before it is seen drops its target quietly.
#[test]
fn test_removed_section_never_fades() {
    let (mut fx, ids) = installed();
    fx.start();
    let removed = ids.sections[3];
    assert!(fx.document_mut().remove(removed));

    scroll(&mut fx, 2300.0);
    fx.advance(500);

    assert_eq!(fx.runner().stats().dropped, 1 + 4);
    assert_eq!(fx.runner().stats().failed, 0);
}

/// Test: resizing re-samples visibility.
#[test]
fn test_resize_reveals_sections() {
    let (mut fx, ids) = installed();
    fx.start();
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("0"));

    fx.handle(&PageEvent::Resize { width: 1280.0, height: 1200.0 });
    assert_eq!(style(&fx, ids.sections[0], "opacity"), Some("1"));
}

/// Test: only left clicks navigate or ripple.
#[test]
fn test_other_buttons_ignored() {
    let (mut fx, ids) = installed();
    fx.start();

    let (x, y) = fx.document().client_rect(ids.nav_links[2]).unwrap().center();
    for button in [MouseButton::Middle, MouseButton::Right] {
        assert_eq!(fx.handle(&PageEvent::Click { x, y, button }), Propagation::Continue);
    }
    fx.advance(1000);

    assert_eq!(fx.document().viewport().scroll_y, 0.0);
    assert!(fx.document().query_selector_all(".ripple").unwrap().is_empty());
}
