//! # Task Scheduler
//!
//! Virtual-clock replacement for `setTimeout`/`setInterval`.
//!
//! ## Model
//!
//! ```text
//! host frame ──advance(dt)──> Scheduler ──run due tasks──> &mut Document
//!                                 │
//!                                 └── repeating tasks re-queue at due + interval
//! ```
//!
//! Tasks run in due-time order. Tasks due at the same instant run in the
//! order they were (re)queued. A repeating task whose interval fits several
//! times into one `advance` runs several times, like a browser catching up
//! on a throttled tab.

use fraudscope_ui::Document;

use crate::error::FxResult;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Raw id value, for logging.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// What a task wants after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskControl {
    /// Run again after the interval (ignored for one-shot tasks).
    Continue,
    /// Drop the task.
    Stop,
}

/// Boxed task body.
pub type TaskFn = Box<dyn FnMut(&mut Document) -> FxResult<TaskControl>>;

struct ScheduledTask {
    id: TaskId,
    due_ms: u64,
    /// Queue order among tasks due at the same instant.
    seq: u64,
    interval_ms: Option<u64>,
    run: TaskFn,
}

/// Single-threaded scheduler over a virtual millisecond clock.
#[derive(Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl Scheduler {
    /// Creates an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the task is still queued.
    #[must_use]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    /// Runs `task` once after `delay_ms`.
    pub fn schedule_once<F>(&mut self, delay_ms: u64, task: F) -> TaskId
    where
        F: FnMut(&mut Document) -> FxResult<TaskControl> + 'static,
    {
        self.push(delay_ms, None, Box::new(task))
    }

    /// Runs `task` every `interval_ms` until it returns [`TaskControl::Stop`]
    /// or is cancelled. The first run is one interval from now. An interval
    /// of zero is treated as one millisecond.
    pub fn schedule_repeating<F>(&mut self, interval_ms: u64, task: F) -> TaskId
    where
        F: FnMut(&mut Document) -> FxResult<TaskControl> + 'static,
    {
        let interval_ms = interval_ms.max(1);
        self.push(interval_ms, Some(interval_ms), Box::new(task))
    }

    /// Cancels a task. Returns false if it already finished or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                tracing::trace!(task = id.raw(), "task cancelled");
                true
            }
            None => false,
        }
    }

    /// Advances the clock by `dt_ms`, running every task that falls due.
    ///
    /// Returns the number of task runs. A task that returns an error is
    /// logged and dropped; the others keep running.
    pub fn advance(&mut self, dt_ms: u64, document: &mut Document) -> usize {
        let deadline = self.now_ms.saturating_add(dt_ms);
        let mut runs = 0;

        while let Some(index) = self.next_due(deadline) {
            let mut task = self.tasks.swap_remove(index);
            self.now_ms = self.now_ms.max(task.due_ms);
            runs += 1;

            tracing::trace!(task = task.id.raw(), at = self.now_ms, "task run");
            match ((task.run)(document), task.interval_ms) {
                (Ok(TaskControl::Continue), Some(interval)) => {
                    task.due_ms = self.now_ms + interval;
                    task.seq = self.bump_seq();
                    self.tasks.push(task);
                }
                (Ok(_), _) => {}
                (Err(err), _) => {
                    tracing::warn!(task = task.id.raw(), error = %err, "scheduled task failed");
                }
            }
        }

        self.now_ms = deadline;
        runs
    }

    fn next_due(&self, deadline: u64) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due_ms <= deadline)
            .min_by_key(|(_, task)| (task.due_ms, task.seq))
            .map(|(index, _)| index)
    }

    fn push(&mut self, delay_ms: u64, interval_ms: Option<u64>, run: TaskFn) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.tasks.push(ScheduledTask {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            interval_ms,
            run,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::error::FxError;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TaskFn) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = Rc::clone(&log);
        let make = move |name: &'static str| -> TaskFn {
            let log = Rc::clone(&shared);
            Box::new(move |_: &mut Document| {
                log.borrow_mut().push(name);
                Ok(TaskControl::Stop)
            })
        };
        (log, make)
    }

    #[test]
    fn test_once_runs_at_due_time() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule_once(100, make("a"));

        assert_eq!(scheduler.advance(99, &mut doc), 0);
        assert_eq!(scheduler.advance(1, &mut doc), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.now_ms(), 100);
    }

    #[test]
    fn test_due_order_then_fifo() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule_once(50, make("late"));
        scheduler.schedule_once(10, make("first"));
        scheduler.schedule_once(10, make("second"));

        scheduler.advance(100, &mut doc);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_repeating_catches_up_and_stops() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = scheduler.schedule_repeating(16, move |_: &mut Document| {
            *counter.borrow_mut() += 1;
            Ok(if *counter.borrow() == 5 { TaskControl::Stop } else { TaskControl::Continue })
        });

        assert_eq!(scheduler.advance(48, &mut doc), 3);
        assert!(scheduler.is_scheduled(id));
        scheduler.advance(1000, &mut doc);
        assert_eq!(*count.borrow(), 5);
        assert!(!scheduler.is_scheduled(id));
    }

    #[test]
    fn test_cancel_prevents_runs() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let (log, make) = recorder();
        let id = scheduler.schedule_once(10, make("never"));

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(100, &mut doc);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        scheduler.schedule_repeating(0, move |_: &mut Document| {
            *counter.borrow_mut() += 1;
            Ok(TaskControl::Continue)
        });

        assert_eq!(scheduler.advance(10, &mut doc), 10);
        assert_eq!(*count.borrow(), 10);
    }

    #[test]
    fn test_failing_task_is_dropped() {
        let mut doc = Document::default();
        let mut scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule_repeating(5, |_: &mut Document| {
            Err(FxError::EffectFailed { effect: "test", reason: "boom".into() })
        });
        scheduler.schedule_once(20, make("survivor"));

        scheduler.advance(50, &mut doc);
        assert_eq!(*log.borrow(), vec!["survivor"]);
        assert_eq!(scheduler.pending(), 0);
    }
}
