//! # Report Page Bootstrap
//!
//! Wires every effect and subscriber onto a document.
//!
//! ## Lifecycle
//!
//! ```text
//! install(document, config)     styles applied, targets registered, banner
//!        │
//!      start()                  observing begins, first sample delivered
//!        │
//!   ┌────┴──────────────────────────────────────────┐
//!   │ handle(event) / drain(queue)   input           │
//!   │ advance(dt_ms)                 timers          │
//!   │ on_layout_change()             geometry        │
//!   └───────────────────────────────────────────────┘
//! ```

use fraudscope_ui::{Document, HoverTracker, HoverTransition, Margin, PointerState, Selector};

use crate::banner::{emit_banner, PageTiming};
use crate::config::FxConfig;
use crate::effects::{BarFill, Counter, FadeIn};
use crate::error::FxResult;
use crate::events::{PageEvent, PageEventQueue, Propagation, Subscriber};
use crate::scheduler::Scheduler;
use crate::subscribers::{
    CustomCursor, ImageFade, MetricTooltips, Parallax, Ripple, RowHover, SmoothScroll,
};
use crate::visibility::{EffectContext, TargetHandle, VisibilityRunner};

/// Targets registered at install, by effect.
#[derive(Debug, Clone, Default)]
pub struct InstalledTargets {
    /// Section fade-ins.
    pub fades: Vec<TargetHandle>,
    /// Stat card counters.
    pub counters: Vec<TargetHandle>,
    /// Bar replays.
    pub bars: Vec<TargetHandle>,
}

/// All page effects bound to one document.
pub struct ReportEffects {
    document: Document,
    scheduler: Scheduler,
    runner: VisibilityRunner,
    subscribers: Vec<Box<dyn Subscriber>>,
    hover: HoverTracker,
    pointer: PointerState,
    targets: InstalledTargets,
    banner: Vec<String>,
}

impl std::fmt::Debug for ReportEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEffects")
            .field("runner", &self.runner)
            .field("scheduler", &self.scheduler)
            .field("subscribers", &self.subscriber_names())
            .finish_non_exhaustive()
    }
}

impl ReportEffects {
    /// Installs every enabled effect on `document`.
    ///
    /// # Errors
    ///
    /// Returns the configuration errors of [`FxConfig::validate`].
    pub fn install(document: Document, config: &FxConfig) -> FxResult<Self> {
        Self::install_with_timing(document, config, None)
    }

    /// Like [`ReportEffects::install`], also logging the page load time.
    ///
    /// # Errors
    ///
    /// See [`ReportEffects::install`].
    pub fn install_with_timing(
        mut document: Document,
        config: &FxConfig,
        timing: Option<PageTiming>,
    ) -> FxResult<Self> {
        config.validate()?;

        let subscribers = Self::build_subscribers(&mut document, config)?;
        let mut runner = VisibilityRunner::new();
        let mut targets = InstalledTargets::default();

        if config.fade.enabled {
            let fade = FadeIn::new(&config.fade);
            let margin = Margin::parse(&config.fade.root_margin)?;
            for section in document.select_all(&Selector::parse(&config.fade.selector)?) {
                fade.prepare(&mut document, section);
                let handle = runner.register(section, config.fade.threshold, margin, false, fade.clone())?;
                targets.fades.push(handle);
            }
        }

        if config.counter.enabled {
            let counter = Counter::new(&config.counter)?;
            let margin = Margin::parse(&config.counter.root_margin)?;
            for card in document.select_all(&Selector::parse(&config.counter.selector)?) {
                let handle =
                    runner.register(card, config.counter.threshold, margin, false, counter.clone())?;
                targets.counters.push(handle);
            }
        }

        if config.bars.enabled {
            let margin = Margin::parse(&config.bars.root_margin)?;
            for card in document.select_all(&Selector::parse(&config.bars.selector)?) {
                let bars = BarFill::new(&config.bars)?;
                let handle = runner.register(card, config.bars.threshold, margin, true, bars)?;
                targets.bars.push(handle);
            }
        }

        let banner = emit_banner(&config.banner, timing);
        tracing::info!(
            fades = targets.fades.len(),
            counters = targets.counters.len(),
            bars = targets.bars.len(),
            subscribers = subscribers.len(),
            "report effects installed"
        );

        Ok(Self {
            document,
            scheduler: Scheduler::new(),
            runner,
            subscribers,
            hover: HoverTracker::new(),
            pointer: PointerState::new(),
            targets,
            banner,
        })
    }

    fn build_subscribers(document: &mut Document, config: &FxConfig) -> FxResult<Vec<Box<dyn Subscriber>>> {
        let mut subscribers: Vec<Box<dyn Subscriber>> = Vec::new();
        if config.scroll.enabled {
            subscribers.push(Box::new(SmoothScroll::new(&config.scroll)?));
        }
        if config.rows.enabled {
            subscribers.push(Box::new(RowHover::new(&config.rows)?));
        }
        if config.tooltip.enabled {
            subscribers.push(Box::new(MetricTooltips::new(&config.tooltip)?));
        }
        if config.parallax.enabled {
            subscribers.push(Box::new(Parallax::new(&config.parallax)?));
        }
        if config.images.enabled {
            let images = ImageFade::new(&config.images)?;
            images.prepare(document);
            subscribers.push(Box::new(images));
        }
        if config.cursor.enabled {
            subscribers.push(Box::new(CustomCursor::new(&config.cursor)));
        }
        if config.ripple.enabled {
            subscribers.push(Box::new(Ripple::new(&config.ripple)));
        }
        Ok(subscribers)
    }

    /// Appends a subscriber. It sees events after the built-in ones.
    pub fn add_subscriber(&mut self, subscriber: impl Subscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Begins observing and delivers the first visibility sample.
    ///
    /// Returns the number of effects fired by that sample.
    pub fn start(&mut self) -> usize {
        self.runner.start();
        self.on_layout_change()
    }

    /// Re-samples visibility after a geometry change.
    ///
    /// Returns the number of effects fired.
    pub fn on_layout_change(&mut self) -> usize {
        let mut ctx = EffectContext::new(&mut self.document, &mut self.scheduler);
        self.runner.sample(&mut ctx)
    }

    /// Handles one input event.
    ///
    /// Pointer moves also produce enter/leave events for the elements the
    /// pointer crossed. Scroll and resize update the viewport and re-sample
    /// visibility.
    pub fn handle(&mut self, event: &PageEvent) -> Propagation {
        match *event {
            PageEvent::PointerMove { x, y } => {
                self.pointer.move_to(x, y);
                let hover = self.update_hover();
                hover.merge(self.dispatch(event))
            }
            PageEvent::Scroll { x, y } => {
                self.document.scroll_to(x, y);
                self.after_scroll()
            }
            PageEvent::Resize { width, height } => {
                self.document.resize(width, height);
                let outcome = self.dispatch(event);
                self.on_layout_change();
                outcome
            }
            PageEvent::Click { .. }
            | PageEvent::ImageLoaded(_)
            | PageEvent::PointerEnter(_)
            | PageEvent::PointerLeave(_) => self.dispatch(event),
        }
    }

    /// Handles every event waiting in `queue`. Returns how many there were.
    pub fn drain(&mut self, queue: &PageEventQueue) -> usize {
        let events = queue.drain();
        for event in &events {
            self.handle(event);
        }
        events.len()
    }

    /// Advances timers by `dt_ms`.
    ///
    /// Scrolling done by timers (smooth scroll) is handled like a host
    /// scroll: subscribers see a [`PageEvent::Scroll`] and visibility is
    /// re-sampled. Returns the number of task runs.
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        let before = *self.document.viewport();
        let runs = self.scheduler.advance(dt_ms, &mut self.document);
        if *self.document.viewport() != before {
            self.after_scroll();
        }
        runs
    }

    /// The page.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The page, for host-side edits. Call
    /// [`ReportEffects::on_layout_change`] after moving elements.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Gives the page back.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// The visibility runner.
    #[must_use]
    pub fn runner(&self) -> &VisibilityRunner {
        &self.runner
    }

    /// The timer queue.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Targets registered at install.
    #[must_use]
    pub fn targets(&self) -> &InstalledTargets {
        &self.targets
    }

    /// Banner lines logged at install.
    #[must_use]
    pub fn banner(&self) -> &[String] {
        &self.banner
    }

    /// Names of the installed subscribers, in dispatch order.
    #[must_use]
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    fn after_scroll(&mut self) -> Propagation {
        let viewport = *self.document.viewport();
        let scroll = PageEvent::Scroll {
            x: viewport.scroll_x,
            y: viewport.scroll_y,
        };
        let mut outcome = self.dispatch(&scroll);
        if self.pointer.inside {
            outcome = outcome.merge(self.update_hover());
        }
        self.on_layout_change();
        outcome
    }

    fn update_hover(&mut self) -> Propagation {
        let transitions = self.hover.update(&mut self.document, self.pointer.x, self.pointer.y);
        transitions
            .into_iter()
            .map(|transition| match transition {
                HoverTransition::Enter(id) => PageEvent::PointerEnter(id),
                HoverTransition::Leave(id) => PageEvent::PointerLeave(id),
            })
            .fold(Propagation::Continue, |outcome, event| {
                outcome.merge(self.dispatch(&event))
            })
    }

    fn dispatch(&mut self, event: &PageEvent) -> Propagation {
        let mut ctx = EffectContext::new(&mut self.document, &mut self.scheduler);
        let mut outcome = Propagation::Continue;
        for subscriber in &mut self.subscribers {
            match subscriber.on_event(event, &mut ctx) {
                Ok(result) => outcome = outcome.merge(result),
                Err(err) => {
                    tracing::warn!(subscriber = subscriber.name(), error = %err, "subscriber failed");
                }
            }
        }
        outcome
    }
}
