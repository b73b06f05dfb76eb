//! Core types for tourbook.
//!
//! This crate provides everything the calendar and search surfaces share:
//! - `Event` and `RawEvent` for event records and their store boundary
//! - `recurrence` for unrolling recurring events into concrete dates
//! - `calendar` for day lookups and month views
//! - `search` for routing free-text queries to a content collection

pub mod cache;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod month;
pub mod recurrence;
pub mod search;
pub mod store;

pub use error::{TourbookError, TourbookResult};
pub use event::{Event, RawEvent, RecurrencePattern};
pub use month::YearMonth;
