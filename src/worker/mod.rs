//! Background capture worker
//!
//! [`Scheduler`] owns at most one worker thread that repeatedly runs a
//! [`Cycle`]. Successful uploads are reported back as [`UploadEvent`]s over a
//! channel; the UI drains that channel on its own thread.

mod cycle;
mod scheduler;

pub use cycle::{CaptureCycle, Cycle, UploadEvent};
pub use scheduler::Scheduler;
