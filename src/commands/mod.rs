//! Family commands
//!
//! Commands represent intent to modify a family. They are applied by the
//! [`Family`](crate::Family) aggregate, which validates the structural rules
//! and reports the resulting events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{FamilyMember, Relationship};
use crate::value_objects::{MemberId, PartnerPair};

/// Commands for family operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FamilyCommand {
    /// Rename the family
    Rename {
        /// The new name
        name: String,
    },

    /// Admit a member; the family assigns its identifier
    AddMember {
        /// The member's data
        member: FamilyMember,
    },

    /// Replace the stored data of an existing member
    UpdateMember {
        /// The member's full new data, carrying its identifier
        member: FamilyMember,
    },

    /// Remove a member and cascade to its relations
    RemoveMember {
        /// The ID of the member to remove
        member_id: MemberId,
    },

    /// Record a union between two members
    AddRelation {
        /// The new relation
        relation: Relationship,
    },

    /// Replace the stored data of an existing relation
    UpdateRelation {
        /// The relation's full new data
        relation: Relationship,
    },

    /// Remove the relation between two partners
    RemoveRelation {
        /// The partners of the relation to remove
        partners: PartnerPair,
    },
}

/// Result type for family operations
pub type FamilyCommandResult<T> = Result<T, FamilyCommandError>;

/// Broad category of a [`FamilyCommandError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed values that can never be valid
    InvalidArgument,
    /// The values conflict with the current content of the family
    InvalidState,
}

/// Errors that can occur while building or mutating a family
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FamilyCommandError {
    #[error("Partners must be different: {0}")]
    SelfRelationship(MemberId),

    #[error("Member {child} can't be their own child in relation {partners}")]
    ChildIsPartner { child: MemberId, partners: PartnerPair },

    #[error("Child {child} already present in relation {partners}")]
    DuplicateChild { child: MemberId, partners: PartnerPair },

    #[error("Member has no assigned ID")]
    UnassignedMember,

    #[error("Member ID '{0}' does not exist")]
    UnknownMember(MemberId),

    #[error("Member ID '{0}' is used more than once")]
    DuplicateMember(MemberId),

    #[error("Member ID '{id}' is not below the family counter {counter}")]
    MemberIdOutOfRange { id: MemberId, counter: i64 },

    #[error("Relation {0} is recorded more than once")]
    DuplicateRelation(PartnerPair),

    #[error("Family counter {0} is negative")]
    InvalidCounter(i64),

    #[error("No member ID left to assign")]
    CounterExhausted,
}

impl FamilyCommandError {
    /// Category of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FamilyCommandError::SelfRelationship(_)
            | FamilyCommandError::ChildIsPartner { .. }
            | FamilyCommandError::DuplicateChild { .. }
            | FamilyCommandError::UnassignedMember => ErrorKind::InvalidArgument,
            FamilyCommandError::UnknownMember(_)
            | FamilyCommandError::DuplicateMember(_)
            | FamilyCommandError::MemberIdOutOfRange { .. }
            | FamilyCommandError::DuplicateRelation(_)
            | FamilyCommandError::InvalidCounter(_)
            | FamilyCommandError::CounterExhausted => ErrorKind::InvalidState,
        }
    }
}
