//! The fraud report page as a laid-out document.
//!
//! Used by the walkthrough binary, the integration tests and the
//! benchmarks. Content mirrors the published report: dataset stats,
//! clustering metrics, the cluster table, feature importances and the
//! visualization gallery.

use fraudscope_ui::{Document, Element, ElementFlags, ElementId, Layout, Rect, Viewport};

use crate::error::FxResult;

/// Height of the hero header.
pub const HERO_HEIGHT: f32 = 600.0;

/// Space between sections.
pub const SECTION_GAP: f32 = 80.0;

const PAGE_WIDTH: f32 = 1280.0;
const SECTION_PADDING: f32 = 40.0;
const HEADING_HEIGHT: f32 = 56.0;

/// Dataset statistics: label and displayed value.
pub const STATS: [(&str, &str); 4] = [
    ("Total transactions", "284,807"),
    ("Fraud cases", "492"),
    ("Legitimate", "284,315"),
    ("Clusters found", "3"),
];

/// Clustering metrics: name, displayed value, bar width, tooltip.
pub const METRICS: [(&str, &str, &str, &str); 3] = [
    ("Silhouette", "0.71", "71%", "Cohesion versus separation, -1 to 1"),
    ("Purity", "0.93", "93%", "Share of points in their cluster's majority class"),
    ("Fraud recall", "0.64", "64%", "Fraud cases flagged as noise or fraud clusters"),
];

/// Cluster table rows: cluster label, size, fraud share.
pub const CLUSTERS: [(&str, &str, &str); 4] = [
    ("-1 (noise)", "3,112", "9.8%"),
    ("0", "279,904", "0.04%"),
    ("1", "1,406", "2.1%"),
    ("2", "385", "31.4%"),
];

/// Feature importances: feature and bar width.
pub const FEATURES: [(&str, &str); 4] = [("V14", "17.04%"), ("V17", "15.32%"), ("V12", "12.87%"), ("V10", "9.55%")];

/// Section ids, in page order.
pub const SECTION_IDS: [&str; 5] = ["overview", "metrics", "clusters", "features", "visualizations"];

/// Handles to the interesting parts of the page.
#[derive(Debug)]
pub struct ReportPage {
    /// The page.
    pub document: Document,
    /// Hero background layer.
    pub particles: ElementId,
    /// Navigation links, one per section.
    pub nav_links: Vec<ElementId>,
    /// Content sections, in page order.
    pub sections: Vec<ElementId>,
    /// Stat cards.
    pub stat_cards: Vec<ElementId>,
    /// The `h3` value node of each stat card.
    pub stat_values: Vec<ElementId>,
    /// Metric cards.
    pub metric_cards: Vec<ElementId>,
    /// Metric bar fills.
    pub metric_fills: Vec<ElementId>,
    /// Tooltip anchors.
    pub tooltips: Vec<ElementId>,
    /// Cluster table body rows.
    pub rows: Vec<ElementId>,
    /// Feature cards.
    pub feature_cards: Vec<ElementId>,
    /// Feature importance bars.
    pub importance_bars: Vec<ElementId>,
    /// Gallery images. The first half are already loaded.
    pub images: Vec<ElementId>,
}

impl ReportPage {
    /// Builds the page in a 1280x720 viewport.
    ///
    /// # Errors
    ///
    /// Only fails if the document rejects an append, which a fresh
    /// document does not.
    pub fn build() -> FxResult<Self> {
        Self::build_in(Viewport::default())
    }

    /// Builds the page in the given viewport.
    ///
    /// # Errors
    ///
    /// See [`ReportPage::build`].
    pub fn build_in(viewport: Viewport) -> FxResult<Self> {
        let mut doc = Document::new(viewport);
        let body = doc.body();

        // Hero
        let hero = node(&mut doc, body, "header", "hero", Rect::new(0.0, 0.0, PAGE_WIDTH, HERO_HEIGHT))?;
        let particles = node(&mut doc, hero, "div", "particles-bg", Rect::new(0.0, 0.0, PAGE_WIDTH, HERO_HEIGHT))?;
        let nav = node(&mut doc, hero, "nav", "nav", Rect::new(0.0, 0.0, PAGE_WIDTH, 64.0))?;
        let link_rects = Layout::horizontal()
            .with_gap(10.0)
            .without_stretch()
            .arrange(Rect::new(390.0, 16.0, 700.0, 32.0), &[(120.0, 32.0); 5]);
        let mut nav_links = Vec::new();
        for (id, rect) in SECTION_IDS.iter().zip(link_rects) {
            let link = node(&mut doc, nav, "a", "nav-link", rect)?;
            set(&mut doc, link, |el| {
                el.set_attribute("href", &format!("#{id}"));
                el.text = capitalize(id);
            });
            nav_links.push(link);
        }

        // Sections
        let main = node(&mut doc, body, "main", "report", Rect::ZERO)?;
        let section_rects = Layout::vertical().with_gap(SECTION_GAP).arrange(
            Rect::new(0.0, HERO_HEIGHT + SECTION_GAP, PAGE_WIDTH, 0.0),
            &[
                (PAGE_WIDTH, 420.0),
                (PAGE_WIDTH, 460.0),
                (PAGE_WIDTH, 420.0),
                (PAGE_WIDTH, 480.0),
                (PAGE_WIDTH, 1000.0),
            ],
        );
        let mut sections = Vec::new();
        for (id, rect) in SECTION_IDS.iter().zip(&section_rects) {
            let section = node(&mut doc, main, "section", "content-section", *rect)?;
            set(&mut doc, section, |el| el.set_attribute("id", id));
            let heading = Rect::new(rect.x + SECTION_PADDING, rect.y + SECTION_PADDING, 600.0, 40.0);
            let h2 = node(&mut doc, section, "h2", "", heading)?;
            set(&mut doc, h2, |el| el.text = capitalize(id));
            sections.push(section);
        }
        let content = |index: usize| -> Rect {
            let rect = section_rects[index];
            Rect::new(
                rect.x + SECTION_PADDING,
                rect.y + SECTION_PADDING + HEADING_HEIGHT,
                rect.width - SECTION_PADDING * 2.0,
                rect.height - SECTION_PADDING * 2.0 - HEADING_HEIGHT,
            )
        };
        let row = |bounds: Rect, size: (f32, f32), count: usize| {
            Layout::horizontal()
                .with_gap(24.0)
                .without_stretch()
                .arrange(bounds, &vec![size; count])
        };

        // Overview stats
        let grid = node(&mut doc, sections[0], "div", "stats-grid", content(0))?;
        let mut stat_cards = Vec::new();
        let mut stat_values = Vec::new();
        for ((label, value), rect) in STATS.iter().zip(row(content(0), (282.0, 160.0), STATS.len())) {
            let card = node(&mut doc, grid, "div", "stat-card", rect)?;
            let h3 = node(&mut doc, card, "h3", "", Rect::new(rect.x + 24.0, rect.y + 32.0, 234.0, 48.0))?;
            set(&mut doc, h3, |el| el.text = (*value).to_string());
            let p = node(&mut doc, card, "p", "", Rect::new(rect.x + 24.0, rect.y + 96.0, 234.0, 24.0))?;
            set(&mut doc, p, |el| el.text = (*label).to_string());
            stat_cards.push(card);
            stat_values.push(h3);
        }

        // Metrics
        let mut metric_cards = Vec::new();
        let mut metric_fills = Vec::new();
        let mut tooltips = Vec::new();
        for ((name, value, width, help), rect) in METRICS.iter().zip(row(content(1), (384.0, 280.0), METRICS.len())) {
            let card = node(&mut doc, sections[1], "div", "metric-card", rect)?;
            let title = node(&mut doc, card, "h4", "", Rect::new(rect.x + 24.0, rect.y + 24.0, 300.0, 28.0))?;
            set(&mut doc, title, |el| el.text = (*name).to_string());
            let tip = node(&mut doc, card, "span", "metric-tooltip", Rect::new(rect.right() - 44.0, rect.y + 28.0, 20.0, 20.0))?;
            set(&mut doc, tip, |el| el.set_attribute("title", help));
            let shown = node(&mut doc, card, "div", "metric-value", Rect::new(rect.x + 24.0, rect.y + 80.0, 200.0, 56.0))?;
            set(&mut doc, shown, |el| el.text = (*value).to_string());
            let bar = node(&mut doc, card, "div", "metric-bar", Rect::new(rect.x + 24.0, rect.y + 200.0, 336.0, 12.0))?;
            let fill = node(&mut doc, bar, "div", "metric-bar-fill", Rect::new(rect.x + 24.0, rect.y + 200.0, 336.0, 12.0))?;
            set(&mut doc, fill, |el| el.style.set("width", *width));
            metric_cards.push(card);
            metric_fills.push(fill);
            tooltips.push(tip);
        }

        // Cluster table
        let table_rect = content(2);
        let table = node(&mut doc, sections[2], "table", "cluster-table", table_rect)?;
        let thead = node(&mut doc, table, "thead", "", Rect::new(table_rect.x, table_rect.y, table_rect.width, 48.0))?;
        let header = node(&mut doc, thead, "tr", "", Rect::new(table_rect.x, table_rect.y, table_rect.width, 48.0))?;
        for text in ["Cluster", "Size", "Fraud share"] {
            let th = node(&mut doc, header, "th", "", Rect::ZERO)?;
            set(&mut doc, th, |el| el.text = text.to_string());
        }
        let body_rect = Rect::new(table_rect.x, table_rect.y + 48.0, table_rect.width, 48.0 * 4.0);
        let tbody = node(&mut doc, table, "tbody", "", body_rect)?;
        let row_rects = Layout::vertical().arrange(body_rect, &[(table_rect.width, 48.0); 4]);
        let mut rows = Vec::new();
        for ((cluster, size, share), rect) in CLUSTERS.iter().zip(row_rects) {
            let tr = node(&mut doc, tbody, "tr", "", rect)?;
            for text in [cluster, size, share] {
                let td = node(&mut doc, tr, "td", "", Rect::ZERO)?;
                set(&mut doc, td, |el| el.text = (*text).to_string());
            }
            rows.push(tr);
        }

        // Feature importances
        let mut feature_cards = Vec::new();
        let mut importance_bars = Vec::new();
        for ((feature, width), rect) in FEATURES.iter().zip(row(content(3), (282.0, 240.0), FEATURES.len())) {
            let card = node(&mut doc, sections[3], "div", "feature-card", rect)?;
            let name = node(&mut doc, card, "h4", "", Rect::new(rect.x + 24.0, rect.y + 24.0, 234.0, 28.0))?;
            set(&mut doc, name, |el| el.text = (*feature).to_string());
            let track = node(&mut doc, card, "div", "importance-track", Rect::new(rect.x + 24.0, rect.y + 180.0, 234.0, 10.0))?;
            let bar = node(&mut doc, track, "div", "importance-bar", Rect::new(rect.x + 24.0, rect.y + 180.0, 234.0, 10.0))?;
            set(&mut doc, bar, |el| el.style.set("width", *width));
            feature_cards.push(card);
            importance_bars.push(bar);
        }

        // Gallery, two rows of two
        let gallery = content(4);
        let half = (gallery.height - 24.0) / 2.0;
        let mut image_rects = row(Rect::new(gallery.x, gallery.y, gallery.width, half), (588.0, half), 2);
        image_rects.extend(row(Rect::new(gallery.x, gallery.y + half + 24.0, gallery.width, half), (588.0, half), 2));
        let mut images = Vec::new();
        for (index, rect) in image_rects.into_iter().enumerate() {
            let img = node(&mut doc, sections[4], "img", "viz-image", rect)?;
            set(&mut doc, img, |el| {
                el.set_attribute("src", &format!("/static/images/plot_{index}.png"));
                if index < 2 {
                    el.flags.set(ElementFlags::COMPLETE);
                }
            });
            images.push(img);
        }

        // Footer and page extent
        let last = section_rects[section_rects.len() - 1];
        let footer_rect = Rect::new(0.0, last.bottom() + SECTION_GAP, PAGE_WIDTH, 120.0);
        node(&mut doc, body, "footer", "footer", footer_rect)?;
        let page = Rect::new(0.0, 0.0, PAGE_WIDTH, footer_rect.bottom());
        let root = doc.root();
        set(&mut doc, root, |el| el.rect = page);
        set(&mut doc, body, |el| el.rect = page);
        set(&mut doc, main, |el| {
            el.rect = Rect::new(0.0, HERO_HEIGHT, PAGE_WIDTH, last.bottom() - HERO_HEIGHT);
        });

        Ok(Self {
            document: doc,
            particles,
            nav_links,
            sections,
            stat_cards,
            stat_values,
            metric_cards,
            metric_fills,
            tooltips,
            rows,
            feature_cards,
            importance_bars,
            images,
        })
    }

    /// Document-space top of a section.
    #[must_use]
    pub fn section_top(&self, index: usize) -> Option<f32> {
        let section = *self.sections.get(index)?;
        self.document.get(section).map(|el| el.rect.y)
    }
}

fn node(doc: &mut Document, parent: ElementId, tag: &str, classes: &str, rect: Rect) -> FxResult<ElementId> {
    let id = doc.append_new(parent, tag, classes)?;
    set(doc, id, |el| el.rect = rect);
    Ok(id)
}

fn set(doc: &mut Document, id: ElementId, edit: impl FnOnce(&mut Element)) {
    if let Some(el) = doc.get_mut(id) {
        edit(el);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_shape() {
        let page = ReportPage::build().unwrap();
        let doc = &page.document;

        assert_eq!(page.sections.len(), 5);
        assert_eq!(page.stat_cards.len(), 4);
        assert_eq!(doc.get(page.stat_values[0]).unwrap().text, "284,807");
        assert_eq!(doc.query_selector_all(".cluster-table tbody tr").unwrap(), page.rows);
        assert_eq!(doc.query_selector_all("a[href^=\"#\"]").unwrap(), page.nav_links);
        assert_eq!(doc.element_by_dom_id("clusters"), Some(page.sections[2]));
    }

    #[test]
    fn test_sections_start_below_the_fold() {
        let page = ReportPage::build().unwrap();
        assert_eq!(page.section_top(0), Some(680.0));
        assert_eq!(page.section_top(1), Some(680.0 + 420.0 + 80.0));
        let (_, max_y) = page.document.max_scroll();
        assert!(max_y > page.section_top(4).unwrap());
    }
}
