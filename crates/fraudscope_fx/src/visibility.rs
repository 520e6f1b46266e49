//! # Visibility-Triggered Effects
//!
//! Runs an [`Effect`] when its element becomes sufficiently visible.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     VisibilityRunner                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ObservationSet {threshold, margin}                           │
//! │     ├── TargetHandle ──> Target {element, fired, effect}      │
//! │     └── TargetHandle ──> Target {...}                         │
//! │  ObservationSet {...}                                         │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲ sample(): fractions from document geometry
//!        ▲ deliver(): fractions computed by the host
//! ```
//!
//! ## Firing rules
//!
//! - A sample fires when `fraction >= threshold` (inclusive).
//! - One-shot targets fire at most once.
//! - Repeatable targets fire once per enter transition.
//! - A target whose element was removed is dropped, never fired.
//! - A live element outside the tree is ignored until it is attached.
//! - A target whose effect is not applicable is skipped and stays unfired.

use fraudscope_ui::{Document, ElementId, Margin};

use crate::config::check_threshold;
use crate::error::FxResult;
use crate::scheduler::Scheduler;

// =============================================================================
// EFFECTS
// =============================================================================

/// Mutable page state an effect may touch.
pub struct EffectContext<'a> {
    /// The page.
    pub document: &'a mut Document,
    /// Timer queue for effects that run over time.
    pub scheduler: &'a mut Scheduler,
}

impl<'a> EffectContext<'a> {
    /// Bundles a document and scheduler.
    #[must_use]
    pub fn new(document: &'a mut Document, scheduler: &'a mut Scheduler) -> Self {
        Self { document, scheduler }
    }
}

/// Work run when a target becomes visible.
pub trait Effect {
    /// Short name for logs.
    fn name(&self) -> &'static str {
        "effect"
    }

    /// Returns false when the element lacks what the effect needs.
    ///
    /// A non-applicable effect is not run and its target is not marked
    /// fired, so a later sample can still run it.
    fn applicable(&self, _element: ElementId, _document: &Document) -> bool {
        true
    }

    /// Runs the effect on a connected element.
    ///
    /// # Errors
    ///
    /// Any error is logged and counted by the runner.
    fn apply(&mut self, element: ElementId, ctx: &mut EffectContext<'_>) -> FxResult<()>;
}

/// An [`Effect`] backed by a closure. Build one with [`effect_fn`].
pub struct FnEffect<F> {
    name: &'static str,
    run: F,
}

impl<F> FnEffect<F> {
    /// Renames the effect for logs.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// Wraps a closure as an [`Effect`].
pub fn effect_fn<F>(run: F) -> FnEffect<F>
where
    F: FnMut(ElementId, &mut EffectContext<'_>) -> FxResult<()>,
{
    FnEffect { name: "closure", run }
}

impl<F> Effect for FnEffect<F>
where
    F: FnMut(ElementId, &mut EffectContext<'_>) -> FxResult<()>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&mut self, element: ElementId, ctx: &mut EffectContext<'_>) -> FxResult<()> {
        (self.run)(element, ctx)
    }
}

// =============================================================================
// TARGETS
// =============================================================================

/// Handle to a registered target.
///
/// Generational: a handle to an unregistered target never aliases a target
/// registered later in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle {
    index: u32,
    generation: u32,
}

/// One notification: a target and its visible fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Target the fraction belongs to.
    pub target: TargetHandle,
    /// Visible fraction in `[0, 1]`.
    pub fraction: f32,
}

/// Counters since the runner was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    /// Effects run successfully.
    pub fired: u64,
    /// Samples at or above threshold whose effect was not applicable.
    pub skipped: u64,
    /// Effects that returned an error.
    pub failed: u64,
    /// Targets dropped because their element was removed.
    pub dropped: u64,
}

struct Target {
    element: ElementId,
    set: usize,
    threshold: f32,
    repeatable: bool,
    fired: bool,
    was_visible: bool,
    effect: Box<dyn Effect>,
}

#[derive(Default)]
struct TargetSlot {
    generation: u32,
    target: Option<Target>,
}

/// Targets sharing visibility parameters.
struct ObservationSet {
    threshold: f32,
    margin: Margin,
    key: (u32, [(u8, u32); 4]),
    members: Vec<TargetHandle>,
}

/// What happened to one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Fired,
    Ignored,
    Skipped,
    Failed,
    Dropped,
}

// =============================================================================
// RUNNER
// =============================================================================

/// Runs effects as their elements become visible.
#[derive(Default)]
pub struct VisibilityRunner {
    slots: Vec<TargetSlot>,
    free: Vec<u32>,
    sets: Vec<ObservationSet>,
    started: bool,
    stats: RunnerStats,
}

impl std::fmt::Debug for VisibilityRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityRunner")
            .field("targets", &self.target_count())
            .field("sets", &self.sets.len())
            .field("started", &self.started)
            .field("stats", &self.stats)
            .finish()
    }
}

impl VisibilityRunner {
    /// Creates a runner that is not yet observing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `effect` to run when `element` is at least `threshold`
    /// visible inside the viewport adjusted by `margin`.
    ///
    /// Targets with equal threshold and margin share an observation set.
    /// The same element may be registered any number of times.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FxError::InvalidThreshold`] unless `0 < threshold <= 1`.
    pub fn register(
        &mut self,
        element: ElementId,
        threshold: f32,
        margin: Margin,
        repeatable: bool,
        effect: impl Effect + 'static,
    ) -> FxResult<TargetHandle> {
        let threshold = check_threshold(threshold)?;
        let set = self.set_for(threshold, margin);

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(TargetSlot::default());
                u32::try_from(self.slots.len() - 1).unwrap_or(u32::MAX)
            }
        };
        let slot = &mut self.slots[index as usize];
        let handle = TargetHandle {
            index,
            generation: slot.generation,
        };
        slot.target = Some(Target {
            element,
            set,
            threshold,
            repeatable,
            fired: false,
            was_visible: false,
            effect: Box::new(effect),
        });
        self.sets[set].members.push(handle);

        tracing::debug!(
            element = element.raw(),
            threshold,
            repeatable,
            effect = self.slots[index as usize].target.as_ref().map_or("", |t| t.effect.name()),
            "target registered"
        );
        Ok(handle)
    }

    /// Begins observing. Samples and deliveries before this are ignored.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Returns true once [`VisibilityRunner::start`] was called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Removes a target. Returns false for a stale handle.
    pub fn unregister(&mut self, handle: TargetHandle) -> bool {
        let Some(target) = self.take(handle) else {
            return false;
        };
        if let Some(set) = self.sets.get_mut(target.set) {
            set.members.retain(|member| *member != handle);
        }
        true
    }

    /// Handles host-computed notifications in order.
    ///
    /// Entries for unknown handles are ignored. Returns the number of
    /// effects that ran successfully.
    pub fn deliver(&mut self, entries: &[IntersectionEntry], ctx: &mut EffectContext<'_>) -> usize {
        if !self.started {
            return 0;
        }
        entries
            .iter()
            .filter(|entry| self.notify(entry.target, entry.fraction, ctx) == Dispatch::Fired)
            .count()
    }

    /// Computes every target's visible fraction from the document and
    /// delivers it. Call after layout, scroll or resize.
    ///
    /// Returns the number of effects that ran successfully.
    pub fn sample(&mut self, ctx: &mut EffectContext<'_>) -> usize {
        if !self.started {
            return 0;
        }
        let entries = self.measure(ctx.document);
        self.deliver(&entries, ctx)
    }

    /// Visible fraction of every target without delivering anything.
    ///
    /// Targets whose element is gone report `0.0`.
    #[must_use]
    pub fn measure(&self, document: &Document) -> Vec<IntersectionEntry> {
        let viewport = document.viewport();
        let mut entries = Vec::with_capacity(self.target_count());
        for set in &self.sets {
            let root = viewport.root_box(&set.margin);
            for &handle in &set.members {
                let fraction = self
                    .get(handle)
                    .and_then(|target| document.get(target.element))
                    .map_or(0.0, |el| el.rect.visible_fraction(&root));
                entries.push(IntersectionEntry {
                    target: handle,
                    fraction,
                });
            }
        }
        entries
    }

    /// Returns true if the target's one-shot effect already ran, or its
    /// repeatable effect ran at least once. False for stale handles.
    #[must_use]
    pub fn is_fired(&self, handle: TargetHandle) -> bool {
        self.get(handle).is_some_and(|target| target.fired)
    }

    /// Returns true if the handle refers to a live target.
    #[must_use]
    pub fn contains(&self, handle: TargetHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Element observed by a target.
    #[must_use]
    pub fn element(&self, handle: TargetHandle) -> Option<ElementId> {
        self.get(handle).map(|target| target.element)
    }

    /// Number of live targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.target.is_some()).count()
    }

    /// Number of distinct observation sets.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Dispatch counters.
    #[must_use]
    pub fn stats(&self) -> RunnerStats {
        self.stats
    }

    fn notify(&mut self, handle: TargetHandle, fraction: f32, ctx: &mut EffectContext<'_>) -> Dispatch {
        let Some(target) = self.get_mut(handle) else {
            return Dispatch::Ignored;
        };
        let element = target.element;

        if !ctx.document.contains(element) {
            tracing::debug!(element = element.raw(), "target element removed, dropping target");
            self.unregister(handle);
            self.stats.dropped += 1;
            return Dispatch::Dropped;
        }
        if !ctx.document.is_connected(element) {
            target.was_visible = false;
            return Dispatch::Ignored;
        }

        if fraction < target.threshold || fraction.is_nan() {
            target.was_visible = false;
            return Dispatch::Ignored;
        }
        if target.fired && (!target.repeatable || target.was_visible) {
            return Dispatch::Ignored;
        }

        let name = target.effect.name();
        if !target.effect.applicable(element, ctx.document) {
            tracing::debug!(element = element.raw(), effect = name, "effect not applicable");
            self.stats.skipped += 1;
            return Dispatch::Skipped;
        }

        target.fired = true;
        target.was_visible = true;
        let result = target.effect.apply(element, ctx);

        match result {
            Ok(()) => {
                tracing::debug!(element = element.raw(), effect = name, fraction, "effect fired");
                self.stats.fired += 1;
                Dispatch::Fired
            }
            Err(err) => {
                tracing::warn!(element = element.raw(), effect = name, error = %err, "effect failed");
                self.stats.failed += 1;
                Dispatch::Failed
            }
        }
    }

    fn set_for(&mut self, threshold: f32, margin: Margin) -> usize {
        let key = (threshold.to_bits(), margin.key());
        if let Some(index) = self.sets.iter().position(|set| set.key == key) {
            return index;
        }
        self.sets.push(ObservationSet {
            threshold,
            margin,
            key,
            members: Vec::new(),
        });
        tracing::trace!(threshold = self.sets[self.sets.len() - 1].threshold, "observation set created");
        self.sets.len() - 1
    }

    fn get(&self, handle: TargetHandle) -> Option<&Target> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.target.as_ref())
    }

    fn get_mut(&mut self, handle: TargetHandle) -> Option<&mut Target> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.target.as_mut())
    }

    fn take(&mut self, handle: TargetHandle) -> Option<Target> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let target = slot.target.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use fraudscope_ui::Rect;

    use crate::error::FxError;

    fn page() -> (Document, ElementId) {
        let mut doc = Document::default();
        let card = doc.append_new(doc.body(), "div", "stat-card").unwrap();
        doc.get_mut(card).unwrap().rect = Rect::new(0.0, 100.0, 200.0, 100.0);
        (doc, card)
    }

    fn counting() -> (Rc<Cell<u32>>, FnEffect<impl FnMut(ElementId, &mut EffectContext<'_>) -> FxResult<()>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let effect = effect_fn(move |_, _| {
            seen.set(seen.get() + 1);
            Ok(())
        });
        (calls, effect)
    }

    #[test]
    fn test_nothing_fires_before_start() {
        let (mut doc, card) = page();
        let mut scheduler = Scheduler::new();
        let mut runner = VisibilityRunner::new();
        let (calls, effect) = counting();
        let handle = runner.register(card, 0.5, Margin::ZERO, false, effect).unwrap();

        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);
        assert_eq!(runner.sample(&mut ctx), 0);
        let entry = IntersectionEntry { target: handle, fraction: 1.0 };
        assert_eq!(runner.deliver(&[entry], &mut ctx), 0);
        assert_eq!(calls.get(), 0);

        runner.start();
        assert_eq!(runner.sample(&mut ctx), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_sets_shared_by_parameters() {
        let (_, card) = page();
        let mut runner = VisibilityRunner::new();
        let margin = Margin::parse("0px 0px -50px 0px").unwrap();

        runner.register(card, 0.1, margin, false, counting().1).unwrap();
        runner.register(card, 0.1, margin, true, counting().1).unwrap();
        runner.register(card, 0.5, Margin::ZERO, false, counting().1).unwrap();

        assert_eq!(runner.target_count(), 3);
        assert_eq!(runner.set_count(), 2);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let (_, card) = page();
        let mut runner = VisibilityRunner::new();
        for bad in [0.0, -0.1, 1.01, f32::NAN] {
            assert!(matches!(
                runner.register(card, bad, Margin::ZERO, false, counting().1),
                Err(FxError::InvalidThreshold(_))
            ));
        }
        assert_eq!(runner.target_count(), 0);
    }

    #[test]
    fn test_margin_shrinks_root() {
        let (mut doc, card) = page();
        // Card spans y 100..200. A -560px bottom margin leaves a root of y 0..160.
        let margin = Margin::parse("0px 0px -560px 0px").unwrap();
        let mut runner = VisibilityRunner::new();
        let handle = runner.register(card, 0.6, margin, false, counting().1).unwrap();

        let entries = runner.measure(&doc);
        assert_eq!(entries.len(), 1);
        assert!((entries[0].fraction - 0.6).abs() < 1e-6);

        runner.start();
        let mut scheduler = Scheduler::new();
        runner.sample(&mut EffectContext::new(&mut doc, &mut scheduler));
        assert!(runner.is_fired(handle));
    }

    #[test]
    fn test_non_applicable_not_marked_fired() {
        struct Picky(Rc<Cell<bool>>);
        impl Effect for Picky {
            fn applicable(&self, _: ElementId, _: &Document) -> bool {
                self.0.get()
            }
            fn apply(&mut self, _: ElementId, _: &mut EffectContext<'_>) -> FxResult<()> {
                Ok(())
            }
        }

        let (mut doc, card) = page();
        let mut scheduler = Scheduler::new();
        let ready = Rc::new(Cell::new(false));
        let mut runner = VisibilityRunner::new();
        let handle = runner
            .register(card, 0.5, Margin::ZERO, false, Picky(Rc::clone(&ready)))
            .unwrap();
        runner.start();

        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);
        runner.sample(&mut ctx);
        assert!(!runner.is_fired(handle));
        assert_eq!(runner.stats().skipped, 1);

        ready.set(true);
        runner.sample(&mut ctx);
        assert!(runner.is_fired(handle));
        assert_eq!(runner.stats().fired, 1);
    }

    #[test]
    fn test_failure_isolated() {
        let (mut doc, card) = page();
        let mut scheduler = Scheduler::new();
        let mut runner = VisibilityRunner::new();
        let failing = effect_fn(|_, _| {
            Err(FxError::EffectFailed { effect: "broken", reason: "nope".into() })
        })
        .named("broken");
        let (calls, effect) = counting();
        let broken = runner.register(card, 0.5, Margin::ZERO, false, failing).unwrap();
        runner.register(card, 0.5, Margin::ZERO, false, effect).unwrap();
        runner.start();

        let mut ctx = EffectContext::new(&mut doc, &mut scheduler);
        assert_eq!(runner.sample(&mut ctx), 1);
        runner.sample(&mut ctx);

        assert_eq!(calls.get(), 1);
        assert!(runner.is_fired(broken));
        assert_eq!(runner.stats().failed, 1);
    }

    #[test]
    fn test_unregister_and_stale_handles() {
        let (mut doc, card) = page();
        let mut scheduler = Scheduler::new();
        let mut runner = VisibilityRunner::new();
        let (calls, effect) = counting();
        let old = runner.register(card, 0.5, Margin::ZERO, false, effect).unwrap();

        assert!(runner.unregister(old));
        assert!(!runner.unregister(old));

        let (_, replacement) = counting();
        let new = runner.register(card, 0.5, Margin::ZERO, false, replacement).unwrap();
        assert_ne!(old, new);
        assert!(!runner.contains(old));

        runner.start();
        let entry = IntersectionEntry { target: old, fraction: 1.0 };
        runner.deliver(&[entry], &mut EffectContext::new(&mut doc, &mut scheduler));
        assert_eq!(calls.get(), 0);
        assert!(!runner.is_fired(new));
    }
}
