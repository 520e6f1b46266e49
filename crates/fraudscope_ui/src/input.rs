//! Pointer input for the page model.
//!
//! Hosts report raw pointer positions; [`HoverTracker`] turns them into
//! `mouseenter`/`mouseleave` style transitions by diffing the chain of
//! elements under the pointer.

use crate::document::Document;
use crate::element::{ElementFlags, ElementId};

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Last known pointer state, in viewport coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Current pointer X position.
    pub x: f32,
    /// Current pointer Y position.
    pub y: f32,
    /// Whether the pointer has been seen over the page at all.
    pub inside: bool,
}

impl PointerState {
    /// Creates a pointer state with no position yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer move.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.inside = true;
    }
}

/// A hover change for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTransition {
    /// Pointer entered the element (or one of its descendants).
    Enter(ElementId),
    /// Pointer left the element and all its descendants.
    Leave(ElementId),
}

/// Tracks which elements are under the pointer.
#[derive(Debug, Default)]
pub struct HoverTracker {
    /// Hovered chain, deepest element first.
    chain: Vec<ElementId>,
}

impl HoverTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hovered chain, deepest element first.
    #[must_use]
    pub fn hovered(&self) -> &[ElementId] {
        &self.chain
    }

    /// Re-evaluates the hover chain for a pointer at viewport position
    /// `(x, y)` and returns the transitions.
    ///
    /// Leaves are reported deepest first, then enters outermost first, the
    /// order browsers dispatch `mouseleave`/`mouseenter`. Elements removed
    /// from the document since the last update are forgotten silently.
    pub fn update(&mut self, doc: &mut Document, x: f32, y: f32) -> Vec<HoverTransition> {
        let (dx, dy) = doc.viewport().to_document(x, y);
        let next: Vec<ElementId> = match doc.hit_test(dx, dy) {
            Some(hit) => std::iter::once(hit).chain(doc.ancestors(hit)).collect(),
            None => Vec::new(),
        };

        let mut transitions = Vec::new();
        for &old in &self.chain {
            if !next.contains(&old) && doc.contains(old) {
                transitions.push(HoverTransition::Leave(old));
            }
        }
        for &new in next.iter().rev() {
            if !self.chain.contains(&new) {
                transitions.push(HoverTransition::Enter(new));
            }
        }

        for transition in &transitions {
            match *transition {
                HoverTransition::Enter(id) => {
                    if let Some(el) = doc.get_mut(id) {
                        el.flags.set(ElementFlags::HOVERED);
                    }
                }
                HoverTransition::Leave(id) => {
                    if let Some(el) = doc.get_mut(id) {
                        el.flags.clear(ElementFlags::HOVERED);
                    }
                }
            }
        }

        if !transitions.is_empty() {
            tracing::trace!(count = transitions.len(), "hover chain changed");
        }
        self.chain = next;
        transitions
    }
}
