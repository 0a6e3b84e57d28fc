//! Availability resolution and method selection.

mod availability;
mod selector;

pub use availability::{
    resolve, resolve_all, AvailabilityStatus, ImpossibleReason, UnlockAction,
};
pub use selector::{select, Selection};
