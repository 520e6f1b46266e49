//! # Report Walkthrough
//!
//! Loads the report page, installs the effects and scripts a visitor:
//! scroll through the stats, hover a metric, click through the nav.
//!
//! Usage: `report_walkthrough [effects.toml]`

use fraudscope_fx::fixture::ReportPage;
use fraudscope_fx::{FxConfig, PageEvent, PageEventQueue, PageTiming, ReportEffects};

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         FRAUDSCOPE REPORT WALKTHROUGH                            ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match FxConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                println!("Error: {e}");
                return;
            }
        },
        None => FxConfig::default(),
    };

    let page = match ReportPage::build() {
        Ok(page) => page,
        Err(e) => {
            println!("Error: could not build page: {e}");
            return;
        }
    };
    let stat_values = page.stat_values.clone();
    let metric_tip = page.tooltips[0];
    let clusters_link = page.nav_links[2];

    let timing = PageTiming {
        navigation_start_ms: 0,
        load_event_end_ms: 412,
    };
    let mut fx = match ReportEffects::install_with_timing(page.document, &config, Some(timing)) {
        Ok(fx) => fx,
        Err(e) => {
            println!("Error: could not install effects: {e}");
            return;
        }
    };
    for line in fx.banner() {
        println!("  {line}");
    }
    println!();
    println!("Subscribers: {}", fx.subscriber_names().join(", "));
    println!(
        "Targets:     {} fades, {} counters, {} bars",
        fx.targets().fades.len(),
        fx.targets().counters.len(),
        fx.targets().bars.len()
    );
    println!();

    let fired = fx.start();
    println!("[t=0ms] start, {fired} effects fired above the fold");

    // Host callbacks push into the queue; the frame loop drains it.
    let queue = PageEventQueue::default();
    let sender = queue.sender();
    sender.send(PageEvent::Scroll { x: 0.0, y: 400.0 });
    sender.send(PageEvent::PointerMove { x: 640.0, y: 300.0 });
    fx.drain(&queue);

    println!("┌─ COUNTERS ─────────────────────────────────────────────────────┐");
    for frame in 0..8 {
        fx.advance(250);
        let shown: Vec<String> = stat_values
            .iter()
            .filter_map(|&id| fx.document().get(id).map(|el| el.text.clone()))
            .collect();
        println!("│ t={:>5}ms  {}", (frame + 1) * 250, shown.join("  |  "));
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    // Scroll to the metrics and hover the first tooltip.
    sender.send(PageEvent::Scroll { x: 0.0, y: 1000.0 });
    fx.drain(&queue);
    let Some(tip_rect) = fx.document().client_rect(metric_tip) else {
        return;
    };
    let (cx, cy) = tip_rect.center();
    fx.handle(&PageEvent::PointerMove { x: cx, y: cy });
    let boxes = fx.document().query_selector_all(".tooltip-box").map_or(0, |b| b.len());
    println!("Hovering metric tooltip at ({cx:.0}, {cy:.0}): {boxes} box(es)");

    // Back to the top, then click the "Clusters" nav link.
    fx.handle(&PageEvent::Scroll { x: 0.0, y: 0.0 });
    fx.advance(100);
    let Some(link_rect) = fx.document().client_rect(clusters_link) else {
        return;
    };
    let (lx, ly) = link_rect.center();
    let outcome = fx.handle(&PageEvent::click(lx, ly));
    println!("Clicked 'Clusters' link: {outcome:?}");
    for _ in 0..6 {
        fx.advance(120);
        println!("  scroll_y = {:.0}", fx.document().viewport().scroll_y);
    }
    fx.advance(1_000);

    let stats = fx.runner().stats();
    println!();
    println!("┌─ RUNNER ───────────────────────────────────────────────────────┐");
    println!("│ fired:   {}", stats.fired);
    println!("│ skipped: {}", stats.skipped);
    println!("│ failed:  {}", stats.failed);
    println!("│ dropped: {}", stats.dropped);
    println!("│ pending tasks: {}", fx.scheduler().pending());
    println!("└──────────────────────────────────────────────────────────────────┘");
}
