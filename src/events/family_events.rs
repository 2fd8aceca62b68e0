//! Facts recorded by the family aggregate
//!
//! Each event describes a change that has actually been applied. Commands
//! that end up as no-ops produce no event.

use serde::{Deserialize, Serialize};

use crate::aggregate::{FamilyMember, Relationship};
use crate::value_objects::{MemberId, PartnerPair};

/// Family renamed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyRenamed {
    /// The name before the change
    pub old_name: String,
    /// The name after the change
    pub new_name: String,
}

/// Member added event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAdded {
    /// The identifier assigned by the family
    pub member_id: MemberId,
    /// The stored member
    pub member: FamilyMember,
}

/// Member updated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdated {
    /// The member's new data
    pub member: FamilyMember,
}

/// Member removed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRemoved {
    /// The ID of the member that was removed
    pub member_id: MemberId,
    /// Relations deleted because the member was one of the partners
    pub removed_relations: Vec<PartnerPair>,
    /// Relations that lost the member from their children
    pub detached_from: Vec<PartnerPair>,
}

/// Relation added event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationAdded {
    /// The stored relation
    pub relation: Relationship,
}

/// Relation updated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationUpdated {
    /// The relation's new data
    pub relation: Relationship,
}

/// Relation removed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRemoved {
    /// The partners of the removed relation
    pub partners: PartnerPair,
}
