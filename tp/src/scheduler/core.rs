//! Scheduler core - the time-ordered run loop
//!
//! [`Scheduler::run`] occupies the calling thread, sleeping in short ticks
//! until the earliest task comes due, then executing it and reacting to its
//! outcome. Mutations requested from other contexts (a [`SchedulerHandle`],
//! including one captured by a running task's own action) are applied only
//! between executions, so the queue is never touched while a task is in
//! flight.
//!
//! Swapping the sleep ticks for a deadline wait on a runtime timer would
//! keep every contract here intact; only the blocking primitive changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::handle::{SchedulerHandle, SchedulerRequest};
use super::queue::DueQueue;
use crate::domain::{Outcome, Uid};
use crate::task::Task;

/// Time-ordered task scheduler
///
/// Owns every registered task from the moment `add_task` succeeds until the
/// task is discarded after a non-repeat outcome, removed by identity, or
/// the scheduler itself is dropped. Each of those exits fires the task's
/// cleanup exactly once.
pub struct Scheduler {
    queue: DueQueue,
    active: Option<Uid>,
    stop: Arc<AtomicBool>,
    tx: Sender<SchedulerRequest>,
    rx: Receiver<SchedulerRequest>,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler with default configuration
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create a scheduler with the given configuration
    pub fn with_config(config: SchedulerConfig) -> Self {
        debug!(?config, "Scheduler::with_config: called");
        let (tx, rx) = mpsc::channel();
        Self {
            queue: DueQueue::new(),
            active: None,
            stop: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
            config,
        }
    }

    /// Get a cloneable handle for stop/add/remove from other contexts
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle::new(Arc::clone(&self.stop), self.tx.clone())
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check whether no tasks are pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Identity of the task currently executing, if any
    pub fn active(&self) -> Option<Uid> {
        self.active
    }

    /// Register a task due one `interval` from now
    pub fn add_task<A>(&mut self, interval: Duration, action: A) -> Result<Uid, SchedulerError>
    where
        A: FnMut() -> Outcome + Send + 'static,
    {
        debug!(?interval, "Scheduler::add_task: called");
        let task = Task::new(interval, Box::new(action), None)?;
        self.admit(task)
    }

    /// Register a task with a cleanup finalizer
    ///
    /// The cleanup receives no arguments; whatever it needs lives in its
    /// captures, separate from the action's.
    pub fn add_task_with_cleanup<A, C>(&mut self, interval: Duration, action: A, cleanup: C) -> Result<Uid, SchedulerError>
    where
        A: FnMut() -> Outcome + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        debug!(?interval, "Scheduler::add_task_with_cleanup: called");
        let task = Task::new(interval, Box::new(action), Some(Box::new(cleanup)))?;
        self.admit(task)
    }

    /// Remove a pending task by identity and destroy it (cleanup fires)
    ///
    /// Unknown identities, repeated removals, and [`Uid::INVALID`] report
    /// [`SchedulerError::TaskNotFound`] and leave the queue untouched; safe
    /// on an empty scheduler.
    pub fn remove_task(&mut self, uid: Uid) -> Result<(), SchedulerError> {
        debug!(%uid, "Scheduler::remove_task: called");
        match self.queue.remove(uid) {
            Some(task) => {
                debug!(%uid, "Scheduler::remove_task: destroying task");
                drop(task);
                Ok(())
            }
            None => Err(SchedulerError::TaskNotFound(uid)),
        }
    }

    /// Run until the queue empties or a stop/terminal outcome intervenes
    ///
    /// Clears the stop flag, then repeatedly: applies deferred requests,
    /// waits for the earliest task's due time (checking the stop flag every
    /// tick), executes the task, and reacts to its outcome. Returns
    /// [`Outcome::Success`] when the queue drained or stop was requested;
    /// [`Outcome::Stop`] or [`Outcome::Error`] when a task ended the loop.
    pub fn run(&mut self) -> Outcome {
        debug!(pending = self.queue.len(), "Scheduler::run: starting");
        self.stop.store(false, Ordering::SeqCst);

        loop {
            self.drain_requests();

            if self.stop.load(Ordering::SeqCst) {
                debug!("Scheduler::run: stop requested, exiting");
                return Outcome::Success;
            }

            let Some(due) = self.queue.next_due() else {
                debug!("Scheduler::run: queue empty, exiting");
                return Outcome::Success;
            };

            let now = Instant::now();
            if now < due {
                thread::sleep(self.config.poll_interval().min(due - now));
                continue;
            }

            let Some(mut task) = self.queue.dequeue() else {
                continue;
            };

            let uid = task.uid();
            self.active = Some(uid);
            debug!(%uid, "Scheduler::run: executing task");

            let outcome = task.run();
            debug!(%uid, %outcome, "Scheduler::run: task finished");

            // Requests the action itself issued apply now, before the
            // outcome is acted on; the loop stays the only queue mutator.
            self.drain_requests();

            let terminal = match outcome {
                Outcome::Success => {
                    drop(task);
                    None
                }
                Outcome::Repeat => {
                    task.reschedule();
                    match self.admit(task) {
                        Ok(_) => None,
                        Err(err) => {
                            // Dropping a task that asked to repeat would
                            // break the repeat contract
                            warn!(%uid, %err, "Scheduler::run: could not re-enqueue repeating task");
                            Some(Outcome::Error)
                        }
                    }
                }
                Outcome::Stop => {
                    drop(task);
                    Some(Outcome::Stop)
                }
                Outcome::Error => {
                    drop(task);
                    Some(Outcome::Error)
                }
            };

            self.active = None;

            if let Some(code) = terminal {
                self.stop.store(true, Ordering::SeqCst);
                debug!(%code, "Scheduler::run: halting");
                return code;
            }
        }
    }

    /// Request the run loop to halt at its next iteration boundary
    pub fn stop(&self) {
        debug!("Scheduler::stop: called");
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Dequeue and destroy every pending task (cleanup fires for each)
    pub fn clear(&mut self) {
        debug!(pending = self.queue.len(), "Scheduler::clear: called");
        while let Some(task) = self.queue.dequeue() {
            debug!(uid = %task.uid(), "Scheduler::clear: destroying task");
            drop(task);
        }
    }

    /// Enqueue under the pending limit; a rejected task is destroyed here
    fn admit(&mut self, task: Task) -> Result<Uid, SchedulerError> {
        let uid = task.uid();

        if let Some(limit) = self.config.max_pending {
            if self.queue.len() >= limit {
                debug!(%uid, limit, "Scheduler::admit: queue full, destroying task");
                drop(task);
                return Err(SchedulerError::QueueFull { limit });
            }
        }

        self.queue.enqueue(task);
        debug!(%uid, pending = self.queue.len(), "Scheduler::admit: task enqueued");
        Ok(uid)
    }

    /// Apply every deferred handle request
    fn drain_requests(&mut self) {
        while let Ok(request) = self.rx.try_recv() {
            match request {
                SchedulerRequest::Add(task) => {
                    let uid = task.uid();
                    match self.admit(task) {
                        Ok(_) => debug!(%uid, "Scheduler::drain_requests: deferred add applied"),
                        Err(err) => warn!(%uid, %err, "Scheduler::drain_requests: deferred add dropped"),
                    }
                }
                SchedulerRequest::Remove(uid) => match self.queue.remove(uid) {
                    Some(task) => {
                        debug!(%uid, "Scheduler::drain_requests: deferred remove applied");
                        drop(task);
                    }
                    None => debug!(%uid, "Scheduler::drain_requests: deferred remove found no task"),
                },
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
