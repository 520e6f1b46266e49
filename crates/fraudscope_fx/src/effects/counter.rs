//! Count-up animation for statistic cards.
//!
//! The card's displayed number is the target. Counting starts at zero and
//! climbs in equal steps, one per frame, until it reaches the target.

use fraudscope_ui::{Document, ElementId, Selector};

use crate::config::CounterConfig;
use crate::error::FxResult;
use crate::scheduler::TaskControl;
use crate::visibility::{Effect, EffectContext};

/// Parses displayed counter text.
///
/// Thousands separators are stripped, then the leading integer is read:
/// optional whitespace, an optional sign, then at least one digit. Anything
/// after the digits is ignored (`"492 cases"` is 492). Returns `None` when
/// there is no leading integer or it does not fit an `i64`.
#[must_use]
pub fn parse_count(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|&c| c != ',').collect();
    let trimmed = cleaned.trim_start();

    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Formats an integer with `,` thousands separators (`1,234,567`).
#[must_use]
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Counts a stat card's value up from zero.
#[derive(Debug, Clone)]
pub struct Counter {
    value_selector: Selector,
    duration_ms: u64,
    frame_ms: u64,
}

impl Counter {
    /// Creates the effect from config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::Ui`] if the value selector does not parse.
    pub fn new(config: &CounterConfig) -> FxResult<Self> {
        Ok(Self {
            value_selector: Selector::parse(&config.value_selector)?,
            duration_ms: config.duration_ms,
            frame_ms: config.frame_ms.max(1),
        })
    }

    /// The card's value node and its parsed target.
    fn target(&self, card: ElementId, document: &Document) -> Option<(ElementId, i64)> {
        let node = document.select_within(card, &self.value_selector).into_iter().next()?;
        let target = parse_count(&document.get(node)?.text)?;
        Some((node, target))
    }
}

impl Effect for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn applicable(&self, element: ElementId, document: &Document) -> bool {
        self.target(element, document).is_some()
    }

    fn apply(&mut self, element: ElementId, ctx: &mut EffectContext<'_>) -> FxResult<()> {
        let Some((node, target)) = self.target(element, ctx.document) else {
            return Ok(());
        };

        #[allow(clippy::cast_precision_loss)]
        let steps = (self.duration_ms as f64 / self.frame_ms as f64).max(1.0);
        #[allow(clippy::cast_precision_loss)]
        let target_f = target as f64;
        let increment = target_f / steps;
        let mut current = 0.0_f64;

        if let Some(el) = ctx.document.get_mut(node) {
            el.text = format_grouped(0);
        }

        ctx.scheduler.schedule_repeating(self.frame_ms, move |document| {
            let Some(el) = document.get_mut(node) else {
                return Ok(TaskControl::Stop);
            };
            current += increment;
            if current >= target_f {
                el.text = format_grouped(target);
                return Ok(TaskControl::Stop);
            }
            #[allow(clippy::cast_possible_truncation)]
            let shown = current.floor() as i64;
            el.text = format_grouped(shown);
            Ok(TaskControl::Continue)
        });

        tracing::debug!(card = element.raw(), target, "counter started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_leading_integer() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count("284,807"), Some(284_807));
        assert_eq!(parse_count("  492 cases"), Some(492));
        assert_eq!(parse_count("-17"), Some(-17));
        assert_eq!(parse_count("+8"), Some(8));
        assert_eq!(parse_count("0.172%"), Some(0));
    }

    #[test]
    fn test_parse_count_rejects() {
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("$100"), None);
        assert_eq!(parse_count("99999999999999999999999"), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1234), "1,234");
        assert_eq!(format_grouped(284_807), "284,807");
        assert_eq!(format_grouped(1_000_000), "1,000,000");
        assert_eq!(format_grouped(-4321), "-4,321");
    }

    #[test]
    fn test_applicable_needs_numeric_value() {
        let mut doc = Document::default();
        let card = doc.append_new(doc.body(), "div", "stat-card").unwrap();
        let h3 = doc.append_new(card, "h3", "").unwrap();
        let empty = doc.append_new(doc.body(), "div", "stat-card").unwrap();
        let counter = Counter::new(&CounterConfig::default()).unwrap();

        doc.get_mut(h3).unwrap().text = "N/A".into();
        assert!(!counter.applicable(card, &doc));
        assert!(!counter.applicable(empty, &doc));

        doc.get_mut(h3).unwrap().text = "492".into();
        assert!(counter.applicable(card, &doc));
    }
}
