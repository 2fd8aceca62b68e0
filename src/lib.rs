//! Family graph domain
//!
//! The core model of a genealogy editor: a family aggregate holding members
//! and the relationships between them. Every read returns a copy and every
//! write stores a copy, so callers can never reach into the family's state.

pub mod aggregate;
pub mod commands;
pub mod domain_events;
pub mod events;
pub mod projections;
pub mod queries;
pub mod value_objects;

// Re-export main types
pub use aggregate::*;
pub use domain_events::*;
pub use events::*;

// Re-export commands and their types
pub use commands::{ErrorKind, FamilyCommand, FamilyCommandError, FamilyCommandResult};

// Re-export query types
pub use queries::{MemberInfo, RelationInfo};

// Re-export value objects
pub use value_objects::{
    Gender, Image, MemberId, PartnerPair, Period, Version, VersionParseError,
};

// Re-export projections
pub use projections::{FamilyProjection, FamilySummary, FamilySummaryProjection, Lineage};
