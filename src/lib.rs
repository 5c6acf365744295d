//! Medication dose scheduling and calendar aggregation.
//!
//! Given a list of [`Medication`] records, compute when each dose falls,
//! which days a medication applies to, and shape those doses into a week
//! strip ([`calendar::build_week`]), a month grid ([`calendar::build_month`])
//! or a per-day timeline ([`timeline::build_day_schedule`]). Everything here
//! is a pure function of its inputs, including "today", so callers recompute
//! whenever the medication list or the selected date changes.

pub mod calendar;
pub mod config;
pub mod daemon;
pub mod database;
pub mod error;
pub mod expiration;
pub mod interval;
pub mod medication;
pub mod schedule;
pub mod time;
pub mod timeline;

pub use error::{Error, Result};
pub use medication::Medication;
