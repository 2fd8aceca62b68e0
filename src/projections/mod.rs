//! Family projections

pub mod family_summary;
pub mod lineage;

pub use family_summary::*;
pub use lineage::*;

use crate::domain_events::FamilyDomainEvent;

/// Trait for read models kept up to date from family events
pub trait FamilyProjection {
    /// Handle a family domain event to update the projection
    fn handle_family_event(&mut self, event: &FamilyDomainEvent);
}
