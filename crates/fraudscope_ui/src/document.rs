//! Document arena for the report page.
//!
//! Owns every element, the tree structure and the viewport. Elements are
//! addressed through generational [`ElementId`] handles; removing an element
//! frees its slot and invalidates every outstanding handle to it.

use crate::element::{Element, ElementFlags, ElementId};
use crate::error::{UiError, UiResult};
use crate::geometry::{Rect, Viewport};
use crate::selector::Selector;

/// One arena slot.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    element: Option<Element>,
    children: Vec<ElementId>,
}

/// The page model: element arena, tree and viewport.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    viewport: Viewport,
}

impl Document {
    /// Creates a document with `html`, `head` and `body` and the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut doc = Self {
            slots: Vec::with_capacity(256),
            free: Vec::new(),
            root: ElementId::new(0, 0),
            head: ElementId::new(0, 0),
            body: ElementId::new(0, 0),
            viewport,
        };

        let root = doc.create_element("html");
        if let Some(el) = doc.get_mut(root) {
            el.flags.set(ElementFlags::CONNECTED);
        }
        doc.root = root;

        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.attach(root, head);
        doc.attach(root, body);
        doc.head = head;
        doc.body = body;

        doc
    }

    /// Returns the `html` element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Returns the `head` element.
    #[must_use]
    pub fn head(&self) -> ElementId {
        self.head
    }

    /// Returns the `body` element.
    #[must_use]
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Returns the viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resizes the viewport, keeping the scroll position in range.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
        self.scroll_to(self.viewport.scroll_x, self.viewport.scroll_y);
    }

    /// Scrolls the viewport, clamped to the document extent.
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        let (max_x, max_y) = self.max_scroll();
        self.viewport.scroll_x = x.clamp(0.0, max_x);
        self.viewport.scroll_y = y.clamp(0.0, max_y);
    }

    /// Largest scroll offsets the document allows.
    #[must_use]
    pub fn max_scroll(&self) -> (f32, f32) {
        let (width, height) = self.extent();
        (
            (width - self.viewport.width).max(0.0),
            (height - self.viewport.height).max(0.0),
        )
    }

    /// Width and height covered by connected elements.
    #[must_use]
    pub fn extent(&self) -> (f32, f32) {
        self.iter_dfs()
            .filter_map(|id| self.get(id))
            .fold((0.0_f32, 0.0_f32), |(w, h), el| {
                (w.max(el.rect.right()), h.max(el.rect.bottom()))
            })
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                u32::try_from(self.slots.len() - 1).unwrap_or(u32::MAX)
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = ElementId::new(index, slot.generation);
        slot.element = Some(Element::new(id, tag));
        slot.children.clear();
        id
    }

    /// Creates an element with the given classes and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownElement`] if `parent` is stale.
    pub fn append_new(&mut self, parent: ElementId, tag: &str, classes: &str) -> UiResult<ElementId> {
        if !self.contains(parent) {
            return Err(UiError::UnknownElement(parent));
        }
        let id = self.create_element(tag);
        if let Some(el) = self.get_mut(id) {
            for class in classes.split_whitespace() {
                el.add_class(class);
            }
        }
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Appends `child` as the last child of `parent`, moving it if it
    /// already has a parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownElement`] for stale handles and
    /// [`UiError::HierarchyCycle`] if `parent` lies inside `child`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> UiResult<()> {
        if !self.contains(parent) {
            return Err(UiError::UnknownElement(parent));
        }
        if !self.contains(child) {
            return Err(UiError::UnknownElement(child));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(UiError::HierarchyCycle { parent, child });
        }

        self.unlink(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Removes an element and its whole subtree.
    ///
    /// Every handle into the subtree becomes stale. Returns false if the
    /// handle was already stale. The three structural elements cannot be
    /// removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if !self.contains(id) || id == self.root || id == self.head || id == self.body {
            return false;
        }

        self.unlink(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index() as usize];
            stack.append(&mut slot.children);
            slot.element = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index());
        }
        true
    }

    /// Returns true if the handle refers to a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Returns true if the element is live and attached under the root.
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(Element::is_connected)
    }

    /// Gets an element by handle.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_ref()
    }

    /// Gets mutable access to an element.
    #[must_use]
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.element.as_mut()
    }

    /// Returns the children of an element (empty for stale handles).
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        if !self.contains(id) {
            return &[];
        }
        &self.slots[id.index() as usize].children
    }

    /// Iterates the ancestors of an element, nearest first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut current = self.get(id).and_then(|el| el.parent);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.get(id).and_then(|el| el.parent);
            Some(id)
        })
    }

    /// Returns all connected element IDs in document (depth-first) order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.iter_subtree(self.root)
    }

    /// Returns an element and its descendants in depth-first order.
    pub fn iter_subtree(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        ElementDfsIterator {
            doc: self,
            stack: if self.contains(id) { vec![id] } else { Vec::new() },
        }
    }

    /// Finds connected elements matching `selector` in document order.
    #[must_use]
    pub fn select_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.iter_dfs()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// Parses `selector` and finds matching connected elements.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidSelector`] if the selector does not parse.
    pub fn query_selector_all(&self, selector: &str) -> UiResult<Vec<ElementId>> {
        Ok(self.select_all(&Selector::parse(selector)?))
    }

    /// Parses `selector` and returns the first match.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidSelector`] if the selector does not parse.
    pub fn query_selector(&self, selector: &str) -> UiResult<Option<ElementId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.iter_dfs().find(|&id| selector.matches(self, id)))
    }

    /// Finds descendants of `scope` (excluding `scope`) matching `selector`.
    #[must_use]
    pub fn select_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.iter_subtree(scope)
            .skip(1)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// Finds the connected element with the given `id` attribute.
    #[must_use]
    pub fn element_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        self.iter_dfs()
            .find(|&id| self.get(id).and_then(Element::dom_id) == Some(dom_id))
    }

    /// Returns the deepest connected element under a document-space point.
    ///
    /// Elements with `pointer-events: none` are transparent to hits.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ElementId> {
        let mut hit = None;
        for id in self.iter_dfs() {
            let Some(el) = self.get(id) else { continue };
            if el.style.get("pointer-events") == Some("none") {
                continue;
            }
            if el.rect.contains(x, y) {
                hit = Some(id);
            }
        }
        hit
    }

    /// Bounding box of an element in viewport coordinates.
    #[must_use]
    pub fn client_rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|el| self.viewport.to_client(el.rect))
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        let connected = self.is_connected(parent);
        self.slots[parent.index() as usize].children.push(child);
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        self.set_connected(child, connected);
    }

    fn unlink(&mut self, child: ElementId) {
        let parent = self.get(child).and_then(|el| el.parent);
        if let Some(parent) = parent {
            if self.contains(parent) {
                self.slots[parent.index() as usize].children.retain(|&c| c != child);
            }
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = None;
        }
        self.set_connected(child, false);
    }

    fn set_connected(&mut self, id: ElementId, connected: bool) {
        let subtree: Vec<_> = self.iter_subtree(id).collect();
        for node in subtree {
            if let Some(el) = self.get_mut(node) {
                if connected {
                    el.flags.set(ElementFlags::CONNECTED);
                } else {
                    el.flags.clear(ElementFlags::CONNECTED);
                }
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

/// Depth-first iterator over a subtree.
struct ElementDfsIterator<'a> {
    doc: &'a Document,
    stack: Vec<ElementId>,
}

impl Iterator for ElementDfsIterator<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        for &child in self.doc.children(id).iter().rev() {
            self.stack.push(child);
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_skeleton() {
        let doc = Document::default();

        assert_eq!(doc.children(doc.root()), [doc.head(), doc.body()]);
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_remove_invalidates_handles() {
        let mut doc = Document::default();
        let body = doc.body();
        let card = doc.append_new(body, "div", "stat-card").unwrap();
        let value = doc.append_new(card, "h3", "").unwrap();

        assert!(doc.remove(card));
        assert!(!doc.contains(card));
        assert!(!doc.contains(value));
        assert!(doc.children(body).is_empty());

        // Slot reuse must not revive the old handle.
        let reused = doc.create_element("div");
        assert_eq!(reused.index(), value.index());
        assert_ne!(reused, value);
        assert!(doc.get(card).is_none());
        assert!(doc.get(value).is_none());
    }

    #[test]
    fn test_detached_elements_are_not_connected() {
        let mut doc = Document::default();
        let loose = doc.create_element("div");
        assert!(doc.contains(loose));
        assert!(!doc.is_connected(loose));

        doc.append_child(doc.body(), loose).unwrap();
        assert!(doc.is_connected(loose));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::default();
        let outer = doc.append_new(doc.body(), "div", "").unwrap();
        let inner = doc.append_new(outer, "div", "").unwrap();

        assert_eq!(
            doc.append_child(inner, outer),
            Err(UiError::HierarchyCycle { parent: inner, child: outer })
        );
    }

    #[test]
    fn test_scroll_is_clamped_to_extent() {
        let mut doc = Document::new(Viewport::new(800.0, 600.0));
        let section = doc.append_new(doc.body(), "section", "").unwrap();
        doc.get_mut(section).unwrap().rect = Rect::new(0.0, 0.0, 800.0, 2000.0);

        doc.scroll_to(0.0, 5000.0);
        assert_eq!(doc.viewport().scroll_y, 1400.0);

        doc.scroll_to(0.0, -10.0);
        assert_eq!(doc.viewport().scroll_y, 0.0);
    }

    #[test]
    fn test_hit_test_prefers_deepest() {
        let mut doc = Document::default();
        let card = doc.append_new(doc.body(), "div", "card").unwrap();
        let label = doc.append_new(card, "span", "").unwrap();
        doc.get_mut(card).unwrap().rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        doc.get_mut(label).unwrap().rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert_eq!(doc.hit_test(15.0, 15.0), Some(label));
        assert_eq!(doc.hit_test(50.0, 50.0), Some(card));

        doc.get_mut(label).unwrap().style.set("pointer-events", "none");
        assert_eq!(doc.hit_test(15.0, 15.0), Some(card));
    }
}
