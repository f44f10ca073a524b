//! SchedulerHandle - cross-context interface to a running scheduler
//!
//! [`Scheduler::run`](super::Scheduler::run) borrows the scheduler for its
//! whole lifetime, so stop requests and add/remove calls from other logical
//! contexts (another thread, or a task's own action) go through this
//! handle. The stop flag is shared state checked at loop boundaries;
//! add/remove become requests the run loop applies between task
//! executions, never while one is in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::debug;

use super::error::SchedulerError;
use crate::domain::{Outcome, Uid};
use crate::task::Task;

/// Deferred mutation applied by the run loop at an iteration boundary
pub(crate) enum SchedulerRequest {
    Add(Task),
    Remove(Uid),
}

/// Handle for interacting with a scheduler whose run loop owns the thread
///
/// Cloneable; every clone talks to the same scheduler. A handle outliving
/// its scheduler reports [`SchedulerError::Disconnected`].
#[derive(Clone)]
pub struct SchedulerHandle {
    stop: Arc<AtomicBool>,
    tx: Sender<SchedulerRequest>,
}

impl SchedulerHandle {
    pub(crate) fn new(stop: Arc<AtomicBool>, tx: Sender<SchedulerRequest>) -> Self {
        Self { stop, tx }
    }

    /// Request the run loop to halt at its next iteration boundary
    ///
    /// Only flips a flag: the task currently executing always finishes and
    /// has its outcome processed first. Idempotent.
    pub fn stop(&self) {
        debug!("SchedulerHandle::stop: called");
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Schedule a task from outside the run loop
    ///
    /// The identity is generated immediately; the enqueue itself happens at
    /// the loop's next iteration boundary. A deferred add that would exceed
    /// the pending limit is destroyed there (its cleanup runs) with a
    /// warning, since there is no caller left to report to.
    pub fn add_task<A>(&self, interval: Duration, action: A) -> Result<Uid, SchedulerError>
    where
        A: FnMut() -> Outcome + Send + 'static,
    {
        let task = Task::new(interval, Box::new(action), None)?;
        self.submit(task)
    }

    /// Schedule a task with a cleanup finalizer from outside the run loop
    pub fn add_task_with_cleanup<A, C>(&self, interval: Duration, action: A, cleanup: C) -> Result<Uid, SchedulerError>
    where
        A: FnMut() -> Outcome + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let task = Task::new(interval, Box::new(action), Some(Box::new(cleanup)))?;
        self.submit(task)
    }

    /// Request removal of a pending task
    ///
    /// Applied at the next iteration boundary; an unknown identity is a
    /// logged no-op there. `Ok` means the request was delivered, not that a
    /// task was found.
    pub fn remove_task(&self, uid: Uid) -> Result<(), SchedulerError> {
        debug!(%uid, "SchedulerHandle::remove_task: called");
        self.tx
            .send(SchedulerRequest::Remove(uid))
            .map_err(|_| SchedulerError::Disconnected)
    }

    fn submit(&self, task: Task) -> Result<Uid, SchedulerError> {
        let uid = task.uid();
        debug!(%uid, "SchedulerHandle::submit: sending add request");
        // On a closed channel the unsent task rides back inside the error
        // and is dropped here, so its cleanup still fires exactly once.
        self.tx.send(SchedulerRequest::Add(task)).map_err(|_| SchedulerError::Disconnected)?;
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    #[test]
    fn test_stop_flips_shared_flag() {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, _rx) = mpsc::channel();
        let handle = SchedulerHandle::new(Arc::clone(&stop), tx);

        handle.stop();
        assert!(stop.load(Ordering::SeqCst));

        // Idempotent
        handle.stop();
        assert!(stop.load(Ordering::SeqCst));
    }

    #[test]
    fn test_add_task_delivers_request() {
        let (tx, rx) = mpsc::channel();
        let handle = SchedulerHandle::new(Arc::new(AtomicBool::new(false)), tx);

        let uid = handle.add_task(Duration::ZERO, || Outcome::Success).unwrap();
        assert!(uid.is_valid());

        match rx.try_recv().unwrap() {
            SchedulerRequest::Add(task) => assert_eq!(task.uid(), uid),
            SchedulerRequest::Remove(_) => panic!("expected an add request"),
        }
    }

    #[test]
    fn test_add_after_scheduler_gone_is_disconnected() {
        let (tx, rx) = mpsc::channel();
        let handle = SchedulerHandle::new(Arc::new(AtomicBool::new(false)), tx);
        drop(rx);

        let cleanups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cleanups);
        let result = handle.add_task_with_cleanup(Duration::ZERO, || Outcome::Success, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(result.unwrap_err(), SchedulerError::Disconnected);
        // The undeliverable task was destroyed, not leaked
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_after_scheduler_gone_is_disconnected() {
        let (tx, rx) = mpsc::channel();
        let handle = SchedulerHandle::new(Arc::new(AtomicBool::new(false)), tx);
        drop(rx);

        assert_eq!(handle.remove_task(Uid::INVALID).unwrap_err(), SchedulerError::Disconnected);
    }
}
