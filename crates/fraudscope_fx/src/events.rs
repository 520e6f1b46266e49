//! # Page Events
//!
//! Input reaching the effects layer from the host page.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   send()   ┌────────────────┐  drain()  ┌───────────────┐
//! │ host callback│──────────>│ PageEventQueue │─────────>│ ReportEffects │
//! └──────────────┘            └────────────────┘           └───────┬───────┘
//!                                                                 │ handle()
//!                                           ┌─────────────────────┼──────────┐
//!                                           ▼                     ▼          ▼
//!                                      SmoothScroll          RowHover   ... Ripple
//! ```
//!
//! Host callbacks may run on other threads; the queue is drained on the UI
//! thread. Enter/leave events are derived from pointer moves by the hover
//! tracker, but hosts with native hover may also send them directly.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use fraudscope_ui::{ElementId, MouseButton};

use crate::error::FxResult;
use crate::visibility::EffectContext;

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Input events. Coordinates are viewport (client) coordinates unless
/// noted otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// The pointer moved.
    PointerMove {
        /// Client X.
        x: f32,
        /// Client Y.
        y: f32,
    },

    /// A button was clicked.
    Click {
        /// Client X.
        x: f32,
        /// Client Y.
        y: f32,
        /// Button that was clicked.
        button: MouseButton,
    },

    /// The page scrolled. Offsets are in document coordinates.
    Scroll {
        /// Horizontal scroll offset.
        x: f32,
        /// Vertical scroll offset.
        y: f32,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: f32,
        /// New viewport height.
        height: f32,
    },

    /// An image finished loading.
    ImageLoaded(ElementId),

    /// The pointer entered an element or one of its descendants.
    PointerEnter(ElementId),

    /// The pointer left an element and all its descendants.
    PointerLeave(ElementId),
}

impl PageEvent {
    /// Left click at a client position.
    #[must_use]
    pub const fn click(x: f32, y: f32) -> Self {
        Self::Click {
            x,
            y,
            button: MouseButton::Left,
        }
    }
}

/// Whether the default action of an event should still happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Let the default action happen.
    #[default]
    Continue,
    /// The default action was taken over by a subscriber.
    DefaultPrevented,
}

impl Propagation {
    /// Combines two outcomes; prevention wins.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == Self::DefaultPrevented || other == Self::DefaultPrevented {
            Self::DefaultPrevented
        } else {
            Self::Continue
        }
    }
}

/// An independent handler of page events.
pub trait Subscriber {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Errors are logged by the dispatcher and do not reach other
    /// subscribers.
    fn on_event(&mut self, event: &PageEvent, ctx: &mut EffectContext<'_>) -> FxResult<Propagation>;
}

// =============================================================================
// QUEUE
// =============================================================================

/// Bounded queue between host callbacks and the UI loop.
pub struct PageEventQueue {
    sender: Sender<PageEvent>,
    receiver: Receiver<PageEvent>,
}

impl PageEventQueue {
    /// Creates a queue holding at most `capacity` undrained events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone it into each callback).
    #[must_use]
    pub fn sender(&self) -> PageEventSender {
        PageEventSender {
            sender: self.sender.clone(),
        }
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<PageEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for PageEventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// Handle for pushing events from host callbacks.
#[derive(Clone)]
pub struct PageEventSender {
    sender: Sender<PageEvent>,
}

impl PageEventSender {
    /// Queues an event without blocking.
    ///
    /// Returns `false` if the queue is full or gone; the event is dropped.
    pub fn send(&self, event: PageEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "page event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
