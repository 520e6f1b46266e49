//! Effects run by the [`crate::VisibilityRunner`].
//!
//! | Effect | Targets | Fires |
//! |--------|---------|-------|
//! | [`FadeIn`] | content sections | once |
//! | [`Counter`] | stat cards | once, when the value parses |
//! | [`BarFill`] | metric and feature cards | every time the card enters |

mod bars;
mod counter;
mod fade;

pub use bars::BarFill;
pub use counter::{format_grouped, parse_count, Counter};
pub use fade::FadeIn;
