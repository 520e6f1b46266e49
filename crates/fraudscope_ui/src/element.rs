//! Core element types.
//!
//! Elements are plain records owned by the [`Document`](crate::Document)
//! arena. Effects hold [`ElementId`] handles, never references.

use std::collections::BTreeMap;

use crate::geometry::Rect;
use crate::style::Style;

/// Handle to an element in the document arena.
///
/// The ID is split into two parts:
/// - Lower 32 bits: slot index in the arena
/// - Upper 32 bits: generation counter for detecting stale handles
///
/// Removing an element bumps the slot generation, so handles to a removed
/// element never resolve again, even after the slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the raw ID value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Element state flags (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementFlags(u32);

impl ElementFlags {
    /// Element is attached under the document root.
    pub const CONNECTED: u32 = 1 << 0;
    /// Image finished loading (`img.complete`).
    pub const COMPLETE: u32 = 1 << 1;
    /// Pointer is over the element or one of its descendants.
    pub const HOVERED: u32 = 1 << 2;

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }
}

/// A node in the page model.
#[derive(Debug, Clone)]
pub struct Element {
    /// Handle of this element.
    pub id: ElementId,
    /// Lowercase tag name (`div`, `h3`, `a`, ...).
    pub tag: String,
    /// Class list, in insertion order without duplicates.
    classes: Vec<String>,
    /// Attributes other than `class`.
    attributes: BTreeMap<String, String>,
    /// Text content of the element itself.
    pub text: String,
    /// Border box in document coordinates.
    pub rect: Rect,
    /// Inline style declarations.
    pub style: Style,
    /// State flags.
    pub flags: ElementFlags,
    /// Parent element (None for detached nodes and the root).
    pub parent: Option<ElementId>,
}

impl Element {
    /// Creates a detached element.
    #[must_use]
    pub fn new(id: ElementId, tag: &str) -> Self {
        Self {
            id,
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            rect: Rect::ZERO,
            style: Style::new(),
            flags: ElementFlags::default(),
            parent: None,
        }
    }

    /// Returns the `id` attribute.
    #[must_use]
    pub fn dom_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Returns the class list.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns true if the element carries the class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adds a class (no-op if present).
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Returns an attribute value. `class` is answered from the class list.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute. Setting `class` replaces the class list.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes.clear();
            for class in value.split_whitespace() {
                self.add_class(class);
            }
            return;
        }
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Removes an attribute, returning its old value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Returns true while the element is attached to the document.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.flags.has(ElementFlags::CONNECTED)
    }

    /// Returns true once an image element has finished loading.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.flags.has(ElementFlags::COMPLETE)
    }
}
