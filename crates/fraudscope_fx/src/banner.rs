//! Startup banner.

use crate::config::BannerConfig;

/// Navigation timing reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTiming {
    /// When navigation started (ms since epoch).
    pub navigation_start_ms: u64,
    /// When the load event finished (ms since epoch).
    pub load_event_end_ms: u64,
}

impl PageTiming {
    /// Page load time, zero if the load event has not finished.
    #[must_use]
    pub fn load_time_ms(&self) -> u64 {
        self.load_event_end_ms.saturating_sub(self.navigation_start_ms)
    }
}

/// Banner lines, plus the load time when timing is known.
#[must_use]
pub fn banner_lines(config: &BannerConfig, timing: Option<PageTiming>) -> Vec<String> {
    let mut lines = vec![config.title.clone(), config.tagline.clone(), config.stack.clone()];
    if let Some(timing) = timing {
        lines.push(format!("⏱️ Load time: {}ms", timing.load_time_ms()));
    }
    lines
}

/// Logs the banner at `info` level. Returns the lines logged.
pub fn emit_banner(config: &BannerConfig, timing: Option<PageTiming>) -> Vec<String> {
    if !config.enabled {
        return Vec::new();
    }
    let lines = banner_lines(config, timing);
    for line in &lines {
        tracing::info!(target: "fraudscope::banner", "{line}");
    }
    lines
}
