//! Family domain events

mod family_events;

pub use family_events::*;
