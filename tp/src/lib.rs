//! Tempo - time-ordered task scheduler
//!
//! Tempo runs deferred, possibly repeating work from a single-threaded
//! loop: every task carries an action, an optional cleanup, an interval,
//! and a next-execution time; a min-priority queue keeps the earliest task
//! on top and the run loop dispatches it when its moment arrives.
//!
//! # Core Concepts
//!
//! - **Time order, not insertion order**: the task with the earliest due
//!   time always executes next
//! - **Outcome-driven**: each action reports success, repeat, stop, or
//!   error, and the loop reacts accordingly
//! - **Cleanup exactly once**: whichever path ends a task's life runs its
//!   cleanup precisely one time
//! - **Cooperative cancellation**: stop requests take effect between task
//!   executions, never pre-empting one in flight
//!
//! # Modules
//!
//! - [`domain`] - task identities and outcome codes
//! - [`task`] - the deferred-work unit and its run/cleanup contract
//! - [`scheduler`] - the due-time queue, run loop, and handle
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod scheduler;
pub mod task;

// Re-export commonly used types
pub use config::{Config, JobConfig};
pub use domain::{Outcome, Uid};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerError, SchedulerHandle};
pub use task::{Action, Cleanup, Task, TaskError};
