//! Task - a unit of deferred, possibly repeating work
//!
//! A task owns an action closure, an optional cleanup closure, a repeat
//! interval, and the next time it is due. The scheduler is the task's only
//! owner once registered; cleanup runs as a finalizer exactly once on
//! whichever path ends the task's life (completion, stop, error, removal,
//! clear, or scheduler teardown). Dropping a task is destroying it.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::domain::{Outcome, Uid};

/// Action invoked when the task comes due; the "parameter" of the classic
/// function-pointer shape lives in the closure's captures
pub type Action = Box<dyn FnMut() -> Outcome + Send>;

/// Finalizer invoked when the task's life ends
pub type Cleanup = Box<dyn FnOnce() + Send>;

/// Errors raised while constructing a task
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    #[error("identity generation failed: system clock is unavailable")]
    IdGeneration,
}

/// A unit of deferred work with a schedule
pub struct Task {
    uid: Uid,
    action: Action,
    cleanup: Option<Cleanup>,
    interval: Duration,
    next_run: Instant,
}

impl Task {
    /// Create a task due one `interval` from now
    ///
    /// Fails without side effects if identity generation fails; neither
    /// closure is invoked on the failure path.
    pub fn new(interval: Duration, action: Action, cleanup: Option<Cleanup>) -> Result<Self, TaskError> {
        let uid = Uid::generate();
        if !uid.is_valid() {
            return Err(TaskError::IdGeneration);
        }

        Ok(Self {
            uid,
            action,
            cleanup,
            interval,
            next_run: Instant::now() + interval,
        })
    }

    /// The task's identity
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// When the task is next due
    pub fn next_run(&self) -> Instant {
        self.next_run
    }

    /// The repeat interval, fixed at creation
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Invoke the action and report its outcome
    ///
    /// On [`Outcome::Error`] the cleanup fires immediately so a failing
    /// task cannot leak what its captures own; the later destruction path
    /// then finds it already spent.
    pub fn run(&mut self) -> Outcome {
        let outcome = (self.action)();

        if outcome == Outcome::Error {
            if let Some(cleanup) = self.cleanup.take() {
                debug!(uid = %self.uid, "Task::run: error outcome, running cleanup early");
                cleanup();
            }
        }

        outcome
    }

    /// Push the due time one interval past now; used after a `Repeat`
    pub fn reschedule(&mut self) {
        self.next_run = Instant::now() + self.interval;
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

/// Tasks are the same iff their identities are equal
impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Task {}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("uid", &self.uid)
            .field("interval", &self.interval)
            .field("next_run", &self.next_run)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_cleanup(counter: &Arc<AtomicUsize>) -> Option<Cleanup> {
        let counter = Arc::clone(counter);
        Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_new_task_is_due_one_interval_out() {
        let before = Instant::now();
        let task = Task::new(Duration::from_millis(50), Box::new(|| Outcome::Success), None).unwrap();

        assert!(task.uid().is_valid());
        assert_eq!(task.interval(), Duration::from_millis(50));
        assert!(task.next_run() >= before + Duration::from_millis(50));
    }

    #[test]
    fn test_run_reports_action_outcome() {
        let mut task = Task::new(Duration::ZERO, Box::new(|| Outcome::Repeat), None).unwrap();
        assert_eq!(task.run(), Outcome::Repeat);
    }

    #[test]
    fn test_run_passes_captured_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut task = Task::new(
            Duration::ZERO,
            Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
                Outcome::Success
            }),
            None,
        )
        .unwrap();

        task.run();
        task.run();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_outcome_fires_cleanup_immediately() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut task = Task::new(
            Duration::ZERO,
            Box::new(|| Outcome::Error),
            counting_cleanup(&cleanups),
        )
        .unwrap();

        task.run();
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);

        // Destruction must not fire it a second time
        drop(task);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_fires_cleanup_once() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let task = Task::new(
            Duration::ZERO,
            Box::new(|| Outcome::Success),
            counting_cleanup(&cleanups),
        )
        .unwrap();

        drop(task);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_without_cleanup_is_noop() {
        let task = Task::new(Duration::ZERO, Box::new(|| Outcome::Success), None).unwrap();
        drop(task);
    }

    #[test]
    fn test_success_outcome_leaves_cleanup_for_drop() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut task = Task::new(
            Duration::ZERO,
            Box::new(|| Outcome::Success),
            counting_cleanup(&cleanups),
        )
        .unwrap();

        task.run();
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);

        drop(task);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reschedule_advances_by_interval() {
        let mut task = Task::new(Duration::from_millis(20), Box::new(|| Outcome::Repeat), None).unwrap();
        let first = task.next_run();

        std::thread::sleep(Duration::from_millis(5));
        task.reschedule();
        assert!(task.next_run() > first);
    }

    #[test]
    fn test_tasks_compare_by_uid() {
        let a = Task::new(Duration::ZERO, Box::new(|| Outcome::Success), None).unwrap();
        let b = Task::new(Duration::ZERO, Box::new(|| Outcome::Success), None).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }
}
