//! # socialhub-worker
//!
//! Low-frequency sweeps. Each sweep is a [`SweepJob`] that deletes
//! expired rows or markers with a conditional delete, so overlapping runs
//! are safe.
//! [`CronScheduler`] fires them on their configured cron expressions.

pub mod jobs;
pub mod scheduler;

pub use jobs::{
    NotificationRetentionJob, OtpSweepJob, SearchTombstoneJob, SweepJob, TokenSweepJob,
};
pub use scheduler::CronScheduler;
