//! Per-client quota admission for Identikit.
//!
//! An [`AdmissionController`] owns a table of cumulative admitted counts per
//! client key. Each admission decision is a single check-then-increment under
//! one lock, and a periodic sweep clears the table.

pub mod controller;
pub mod sweep;

pub use controller::{
    Admission, AdmissionController, DEFAULT_LIMIT, DEFAULT_REPORT_THRESHOLD,
    DEFAULT_RESET_INTERVAL, MIN_RESET_INTERVAL, QuotaPolicy, SweepReport,
};
pub use sweep::SweepHandle;
