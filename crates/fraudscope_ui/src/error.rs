//! # UI Error Types
//!
//! Errors raised while building or querying the page model.

use thiserror::Error;

use crate::element::ElementId;

/// Errors that can occur in the page model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// A selector string could not be parsed.
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A root margin string could not be parsed.
    #[error("invalid margin {0:?}")]
    InvalidMargin(String),

    /// The element handle is stale or was never issued.
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),

    /// Attempted to attach an element under itself or its descendant.
    #[error("cannot append {child:?} under {parent:?}: would create a cycle")]
    HierarchyCycle {
        /// The would-be parent.
        parent: ElementId,
        /// The element being appended.
        child: ElementId,
    },
}

/// Result type for page model operations.
pub type UiResult<T> = Result<T, UiError>;
