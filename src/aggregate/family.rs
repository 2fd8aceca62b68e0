//! Family Aggregate
//!
//! The family owns every member and every relationship and is the only place
//! where they can change. Reads hand out copies and writes store copies, so no
//! caller ever holds a reference into the aggregate's storage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::{FamilyMember, Relationship};
use crate::commands::{FamilyCommand, FamilyCommandError, FamilyCommandResult};
use crate::domain_events::FamilyDomainEvent;
use crate::events::{
    FamilyRenamed, MemberAdded, MemberRemoved, MemberUpdated, RelationAdded, RelationRemoved,
    RelationUpdated,
};
use crate::queries;
use crate::value_objects::{MemberId, PartnerPair};

/// Everything needed to rebuild a family
///
/// Produced by [`Family::snapshot`] and accepted by [`Family::from_snapshot`].
/// Document serializers persist this tuple in whatever format they like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySnapshot {
    /// Next identifier the family will assign
    pub counter: i64,
    /// The family's name
    pub name: String,
    /// All members, ordered by ID
    pub members: Vec<FamilyMember>,
    /// All relations, in insertion order
    pub relations: Vec<Relationship>,
}

/// Family aggregate root
///
/// Invariants kept by every mutation:
/// - member IDs are unique and only assigned from the family's counter, which
///   never goes back, even after removals;
/// - two members are connected by at most one relation;
/// - every partner and child of a relation is a member of the family.
#[derive(Debug, Clone)]
pub struct Family {
    counter: i64,
    name: String,
    members: BTreeMap<MemberId, FamilyMember>,
    relations: IndexMap<PartnerPair, Relationship>,
}

impl Family {
    /// Create a family with no members and no relations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            counter: 0,
            name: name.into(),
            members: BTreeMap::new(),
            relations: IndexMap::new(),
        }
    }

    /// Rebuild a family from previously persisted data
    ///
    /// Fails if the data breaks any invariant: a negative counter, unassigned,
    /// duplicated or out-of-range member IDs, relations to unknown members, or
    /// two relations for the same pair.
    pub fn restore(
        counter: i64,
        name: impl Into<String>,
        members: impl IntoIterator<Item = FamilyMember>,
        relations: impl IntoIterator<Item = Relationship>,
    ) -> FamilyCommandResult<Self> {
        if counter < 0 {
            return Err(FamilyCommandError::InvalidCounter(counter));
        }

        let mut family = Self {
            counter,
            name: name.into(),
            members: BTreeMap::new(),
            relations: IndexMap::new(),
        };

        for member in members {
            let id = member.id();
            if !id.is_assigned() {
                return Err(FamilyCommandError::UnassignedMember);
            }
            if id.value() >= counter {
                return Err(FamilyCommandError::MemberIdOutOfRange { id, counter });
            }
            if family.members.insert(id, member).is_some() {
                return Err(FamilyCommandError::DuplicateMember(id));
            }
        }

        for relation in relations {
            family.check_references(&relation)?;
            let partners = relation.partners();
            if family.relations.insert(partners, relation).is_some() {
                return Err(FamilyCommandError::DuplicateRelation(partners));
            }
        }

        tracing::debug!(
            "Family restored: {} ({} members, {} relations)",
            family.name,
            family.members.len(),
            family.relations.len()
        );
        Ok(family)
    }

    /// Rebuild a family from a snapshot
    pub fn from_snapshot(snapshot: FamilySnapshot) -> FamilyCommandResult<Self> {
        Self::restore(snapshot.counter, snapshot.name, snapshot.members, snapshot.relations)
    }

    /// Copy of everything needed to rebuild this family
    pub fn snapshot(&self) -> FamilySnapshot {
        FamilySnapshot {
            counter: self.counter,
            name: self.name.clone(),
            members: self.members.values().cloned().collect(),
            relations: self.relations.values().cloned().collect(),
        }
    }

    /// Get the family name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the family
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.apply_rename(name.into());
    }

    /// Next identifier the family will assign
    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Copies of all members, ordered by ID
    pub fn get_all_members(&self) -> BTreeSet<FamilyMember> {
        self.members.values().cloned().collect()
    }

    /// Copy of the member with the given ID
    pub fn get_member(&self, id: MemberId) -> Option<FamilyMember> {
        self.members.get(&id).cloned()
    }

    pub fn contains_member(&self, id: MemberId) -> bool {
        self.members.contains_key(&id)
    }

    /// Admit a copy of `member` and return its ID
    ///
    /// If a member with the same ID already belongs to the family nothing
    /// changes and that ID is returned. Otherwise the copy gets the next ID
    /// from the counter.
    ///
    /// Fails with [`FamilyCommandError::CounterExhausted`] when the counter
    /// has no identifier left to hand out.
    pub fn add_member(&mut self, member: &FamilyMember) -> FamilyCommandResult<MemberId> {
        Ok(match self.apply_add_member(member)? {
            Some(event) => event.member_id,
            None => member.id(),
        })
    }

    /// Replace the stored member that has the same ID; no-op if there is none
    pub fn update_member(&mut self, member: &FamilyMember) {
        self.apply_update_member(member);
    }

    /// Remove a member and cascade to its relations; no-op if unknown
    ///
    /// Relations where the member is a partner are deleted; relations where
    /// it is a child only lose that child.
    pub fn remove_member(&mut self, id: MemberId) {
        self.apply_remove_member(id);
    }

    /// Copies of all relations, in insertion order
    pub fn get_all_relations(&self) -> Vec<Relationship> {
        self.relations.values().cloned().collect()
    }

    /// Copy of the relation between two members, in either order
    pub fn get_relation(&self, id1: MemberId, id2: MemberId) -> Option<Relationship> {
        PartnerPair::new(id1, id2).and_then(|pair| self.relations.get(&pair).cloned())
    }

    /// Copies of the relations where the member is a partner
    pub fn get_relations(&self, member_id: MemberId) -> Vec<Relationship> {
        self.relations
            .values()
            .filter(|relation| relation.is_in_relationship(member_id))
            .cloned()
            .collect()
    }

    /// Record a copy of `relation`
    ///
    /// Nothing happens if the two partners are already connected, whether by
    /// this very relation or an older, possibly ended, one. Fails if a
    /// partner or child is not a member of the family.
    pub fn add_relation(&mut self, relation: &Relationship) -> FamilyCommandResult<()> {
        self.apply_add_relation(relation).map(|_| ())
    }

    /// Replace the stored relation between the same partners
    ///
    /// No-op if the partners have no relation. Fails, leaving the family
    /// untouched, if a child is not a member of the family.
    pub fn update_relation(&mut self, relation: &Relationship) -> FamilyCommandResult<()> {
        self.apply_update_relation(relation).map(|_| ())
    }

    /// Remove the stored relation between the same partners; no-op if none
    pub fn remove_relationship(&mut self, relation: &Relationship) {
        self.apply_remove_relation(relation.partners());
    }

    /// Remove the relation between the given partners; no-op if none
    pub fn remove_relation(&mut self, partners: PartnerPair) {
        self.apply_remove_relation(partners);
    }

    /// Whether two members are partners in a relation
    pub fn are_in_relationship(&self, id1: MemberId, id2: MemberId) -> bool {
        PartnerPair::new(id1, id2).is_some_and(|pair| self.relations.contains_key(&pair))
    }

    /// Whether the member is listed as a child in any relation
    pub fn has_parents(&self, member_id: MemberId) -> bool {
        self.relations.values().any(|relation| relation.is_child(member_id))
    }

    /// Partners of the relation listing the member as a child
    pub fn parents_of(&self, member_id: MemberId) -> Option<PartnerPair> {
        self.relations
            .values()
            .find(|relation| relation.is_child(member_id))
            .map(Relationship::partners)
    }

    /// Copies of the children of the relation between the given partners
    pub fn children_of(&self, partners: PartnerPair) -> Vec<FamilyMember> {
        self.relations
            .get(&partners)
            .map(|relation| {
                relation
                    .children()
                    .iter()
                    .filter_map(|id| self.get_member(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Members that may be added as children of `relation`
    ///
    /// Without a relation every member is returned. See
    /// [`queries::potential_children`] for the filtering rules.
    pub fn get_potential_children(&self, relation: Option<&Relationship>) -> BTreeSet<FamilyMember> {
        queries::potential_children(self, relation)
    }

    /// Apply a command and return the events describing what changed
    ///
    /// A command that turns out to be a no-op yields no event.
    pub fn handle_command(
        &mut self,
        command: FamilyCommand,
    ) -> FamilyCommandResult<Vec<FamilyDomainEvent>> {
        let event = match command {
            FamilyCommand::Rename { name } => {
                self.apply_rename(name).map(FamilyDomainEvent::FamilyRenamed)
            }
            FamilyCommand::AddMember { member } => {
                self.apply_add_member(&member)?.map(FamilyDomainEvent::MemberAdded)
            }
            FamilyCommand::UpdateMember { member } => {
                self.apply_update_member(&member).map(FamilyDomainEvent::MemberUpdated)
            }
            FamilyCommand::RemoveMember { member_id } => {
                self.apply_remove_member(member_id).map(FamilyDomainEvent::MemberRemoved)
            }
            FamilyCommand::AddRelation { relation } => {
                self.apply_add_relation(&relation)?.map(FamilyDomainEvent::RelationAdded)
            }
            FamilyCommand::UpdateRelation { relation } => {
                self.apply_update_relation(&relation)?.map(FamilyDomainEvent::RelationUpdated)
            }
            FamilyCommand::RemoveRelation { partners } => {
                self.apply_remove_relation(partners).map(FamilyDomainEvent::RelationRemoved)
            }
        };

        if let Some(event) = &event {
            tracing::trace!("Family {} emitted {}", self.name, event.event_type());
        }
        Ok(event.into_iter().collect())
    }

    fn next_member_id(&mut self) -> FamilyCommandResult<MemberId> {
        let next = self
            .counter
            .checked_add(1)
            .ok_or(FamilyCommandError::CounterExhausted)?;
        let id = MemberId::new(self.counter);
        self.counter = next;
        Ok(id)
    }

    /// Fails if a partner or a child of `relation` is not a member
    fn check_references(&self, relation: &Relationship) -> FamilyCommandResult<()> {
        let partners = relation.partners();
        [partners.low(), partners.high()]
            .iter()
            .chain(relation.children())
            .find(|id| !self.members.contains_key(*id))
            .map_or(Ok(()), |id| Err(FamilyCommandError::UnknownMember(*id)))
    }

    fn apply_rename(&mut self, name: String) -> Option<FamilyRenamed> {
        if name == self.name {
            return None;
        }
        let old_name = std::mem::replace(&mut self.name, name);
        tracing::debug!("Family renamed: {} -> {}", old_name, self.name);
        Some(FamilyRenamed {
            old_name,
            new_name: self.name.clone(),
        })
    }

    fn apply_add_member(
        &mut self,
        member: &FamilyMember,
    ) -> FamilyCommandResult<Option<MemberAdded>> {
        if self.members.contains_key(&member.id()) {
            tracing::trace!("Member {} already in family, not added", member.id());
            return Ok(None);
        }

        let member_id = match self.next_member_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Member not added: {}", e);
                return Err(e);
            }
        };
        let stored = member.with_id(member_id);
        self.members.insert(member_id, stored.clone());
        tracing::debug!("Member added: {} ({})", member_id, stored);

        Ok(Some(MemberAdded {
            member_id,
            member: stored,
        }))
    }

    fn apply_update_member(&mut self, member: &FamilyMember) -> Option<MemberUpdated> {
        let stored = self.members.get_mut(&member.id())?;
        *stored = member.clone();
        tracing::debug!("Member updated: {}", member.id());

        Some(MemberUpdated {
            member: member.clone(),
        })
    }

    fn apply_remove_member(&mut self, id: MemberId) -> Option<MemberRemoved> {
        self.members.remove(&id)?;

        let mut removed_relations = Vec::new();
        let mut detached_from = Vec::new();
        self.relations.retain(|pair, relation| {
            if pair.contains(id) {
                removed_relations.push(*pair);
                false
            } else {
                if relation.is_child(id) {
                    relation.remove_child(id);
                    detached_from.push(*pair);
                }
                true
            }
        });

        tracing::debug!(
            "Member removed: {} (relations removed: {}, detached from: {})",
            id,
            removed_relations.len(),
            detached_from.len()
        );

        Some(MemberRemoved {
            member_id: id,
            removed_relations,
            detached_from,
        })
    }

    fn apply_add_relation(
        &mut self,
        relation: &Relationship,
    ) -> FamilyCommandResult<Option<RelationAdded>> {
        let partners = relation.partners();
        if self.relations.contains_key(&partners) {
            tracing::trace!("Partners {} already connected, relation not added", partners);
            return Ok(None);
        }

        if let Err(e) = self.check_references(relation) {
            tracing::warn!("Relation {} rejected: {}", partners, e);
            return Err(e);
        }

        self.relations.insert(partners, relation.clone());
        tracing::debug!("Relation added: {}", partners);

        Ok(Some(RelationAdded {
            relation: relation.clone(),
        }))
    }

    fn apply_update_relation(
        &mut self,
        relation: &Relationship,
    ) -> FamilyCommandResult<Option<RelationUpdated>> {
        let partners = relation.partners();
        if !self.relations.contains_key(&partners) {
            tracing::trace!("No relation between {}, nothing to update", partners);
            return Ok(None);
        }

        if let Some(missing) = relation
            .children()
            .iter()
            .find(|id| !self.members.contains_key(*id))
        {
            tracing::warn!("Relation {} not updated: unknown child {}", partners, missing);
            return Err(FamilyCommandError::UnknownMember(*missing));
        }

        self.relations.insert(partners, relation.clone());
        tracing::debug!("Relation updated: {}", partners);

        Ok(Some(RelationUpdated {
            relation: relation.clone(),
        }))
    }

    fn apply_remove_relation(&mut self, partners: PartnerPair) -> Option<RelationRemoved> {
        self.relations.shift_remove(&partners)?;
        tracing::debug!("Relation removed: {}", partners);

        Some(RelationRemoved { partners })
    }
}
