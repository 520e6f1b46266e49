//! # FRAUDSCOPE FX
//!
//! Interactive effects for the DBSCAN fraud detection report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ReportEffects                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  VisibilityRunner      Subscribers           Scheduler       │
//! │  ├── FadeIn            ├── SmoothScroll      (virtual ms)    │
//! │  ├── Counter           ├── RowHover                          │
//! │  └── BarFill           ├── MetricTooltips                    │
//! │                        ├── Parallax                          │
//! │                        ├── ImageFade                         │
//! │                        ├── CustomCursor                      │
//! │                        └── Ripple                            │
//! └─────────────────────────────────────────────────────────────┘
//!              ▲ PageEvent (direct or via PageEventQueue)
//! ```
//!
//! ## Rules
//!
//! 1. Effects are cosmetic. A failing effect is logged and skipped.
//! 2. Nothing fires on a detached element.
//! 3. Everything that runs over time is a [`Scheduler`] task.
//!
//! ## Example
//!
//! ```
//! use fraudscope_fx::{fixture::ReportPage, FxConfig, PageEvent, ReportEffects};
//!
//! let page = ReportPage::build()?;
//! let mut fx = ReportEffects::install(page.document, &FxConfig::default())?;
//! fx.start();
//!
//! fx.handle(&PageEvent::Scroll { x: 0.0, y: 700.0 });
//! fx.advance(2_000);
//! # Ok::<(), fraudscope_fx::FxError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod banner;
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod fixture;
pub mod report;
pub mod scheduler;
pub mod subscribers;
pub mod visibility;

pub use banner::PageTiming;
pub use config::FxConfig;
pub use error::{FxError, FxResult};
pub use events::{PageEvent, PageEventQueue, PageEventSender, Propagation, Subscriber};
pub use report::{InstalledTargets, ReportEffects};
pub use scheduler::{Scheduler, TaskControl, TaskId};
pub use visibility::{
    effect_fn, Effect, EffectContext, IntersectionEntry, RunnerStats, TargetHandle, VisibilityRunner,
};
