//! Status-duration accounting for work items.
//!
//! Turns an item's changelog into a flat, time-ordered list of status
//! changes and measures how many whole days the item spent in one status
//! within a reporting window.

mod accumulator;
mod changelog;
mod clock;
mod window;

pub use accumulator::{compute, DurationDays, IntervalAccumulator};
pub use changelog::{
    parse_timestamp, ChangeItem, Changelog, History, StatusChangeEvent, STATUS_FIELD,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use window::ReportingWindow;
