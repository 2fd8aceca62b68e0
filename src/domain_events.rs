//! Domain events enum for family domain

use crate::events::{
    FamilyRenamed, MemberAdded, MemberRemoved, MemberUpdated, RelationAdded, RelationRemoved,
    RelationUpdated,
};
use serde::{Deserialize, Serialize};

/// Enum wrapper for family domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FamilyDomainEvent {
    /// The family was renamed
    FamilyRenamed(FamilyRenamed),
    /// A member was admitted
    MemberAdded(MemberAdded),
    /// A member's data was replaced
    MemberUpdated(MemberUpdated),
    /// A member was removed, with its cascade
    MemberRemoved(MemberRemoved),
    /// A relation was recorded
    RelationAdded(RelationAdded),
    /// A relation's data was replaced
    RelationUpdated(RelationUpdated),
    /// A relation was removed
    RelationRemoved(RelationRemoved),
}

impl FamilyDomainEvent {
    /// Short name of the event, as it appears in logs
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FamilyRenamed(_) => "renamed",
            Self::MemberAdded(_) => "member.added",
            Self::MemberUpdated(_) => "member.updated",
            Self::MemberRemoved(_) => "member.removed",
            Self::RelationAdded(_) => "relation.added",
            Self::RelationUpdated(_) => "relation.updated",
            Self::RelationRemoved(_) => "relation.removed",
        }
    }
}
