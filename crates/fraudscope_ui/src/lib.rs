//! # FRAUDSCOPE UI
//!
//! Headless model of the fraud detection report page:
//! - Document arena with generational element handles
//! - Layout geometry and viewport intersection
//! - Inline style declarations
//! - Pointer input with derived hover transitions
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     PAGE MODEL                          │
//! ├────────────────────────────────────────────────────────┤
//! │  Host DOM → Document → Geometry → Effects (fx crate)   │
//! │      ↓          ↓          ↓              ↓            │
//! │  Input     Selectors   Visibility    Style Mutation    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate knows about timers or effects. It is the
//! surface that `fraudscope_fx` reads and mutates.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod document;
pub mod element;
pub mod error;
pub mod geometry;
pub mod input;
pub mod selector;
pub mod style;
pub mod tooltip;

pub use animation::{Animation, Easing};
pub use document::Document;
pub use element::{Element, ElementFlags, ElementId};
pub use error::{UiError, UiResult};
pub use geometry::{Layout, LengthOrPercent, Margin, Rect, Viewport};
pub use input::{HoverTracker, HoverTransition, MouseButton, PointerState};
pub use selector::Selector;
pub use style::{Color, Style, Theme};
pub use tooltip::{TooltipConfig, TooltipManager};
