//! Input subscribers.
//!
//! Each subscriber owns the state it needs and reacts to [`crate::PageEvent`]s
//! on its own. None of them knows about the others.

mod cursor;
mod images;
mod parallax;
mod ripple;
mod row_hover;
mod smooth_scroll;
mod tooltip;

pub use cursor::CustomCursor;
pub use images::ImageFade;
pub use parallax::Parallax;
pub use ripple::Ripple;
pub use row_hover::RowHover;
pub use smooth_scroll::SmoothScroll;
pub use tooltip::MetricTooltips;
