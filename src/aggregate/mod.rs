//! Family aggregate and the entities it owns

pub mod family;
pub mod member;
pub mod relationship;

pub use family::*;
pub use member::*;
pub use relationship::*;
