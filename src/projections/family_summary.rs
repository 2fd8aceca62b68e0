//! Family summary projection
//!
//! Keeps member and relation counts up to date from domain events, so a UI
//! status bar does not have to rescan the family after every edit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::aggregate::{Family, Relationship};
use crate::domain_events::FamilyDomainEvent;
use crate::value_objects::PartnerPair;

use super::FamilyProjection;

/// Summary information about a family
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySummary {
    /// Name of the family
    pub name: String,
    /// Current number of members
    pub member_count: usize,
    /// Current number of relations
    pub relation_count: usize,
    /// Relations that are weddings
    pub wedding_count: usize,
    /// Relations that have ended
    pub ended_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct RelationFlags {
    is_wedding: bool,
    has_ended: bool,
}

impl From<&Relationship> for RelationFlags {
    fn from(relation: &Relationship) -> Self {
        Self {
            is_wedding: relation.is_wedding(),
            has_ended: relation.has_ended(),
        }
    }
}

/// Projection that maintains the summary of one family
#[derive(Debug, Clone, Default)]
pub struct FamilySummaryProjection {
    summary: FamilySummary,
    relations: HashMap<PartnerPair, RelationFlags>,
}

impl FamilySummaryProjection {
    /// Create a projection seeded from the current state of `family`
    pub fn from_family(family: &Family) -> Self {
        let mut projection = Self {
            summary: FamilySummary {
                name: family.name().to_string(),
                member_count: family.member_count(),
                ..Default::default()
            },
            relations: HashMap::new(),
        };
        for relation in family.get_all_relations() {
            projection.insert_relation(&relation);
        }
        projection
    }

    /// Get the current summary
    pub fn summary(&self) -> &FamilySummary {
        &self.summary
    }

    fn insert_relation(&mut self, relation: &Relationship) {
        let flags = RelationFlags::from(relation);
        if let Some(previous) = self.relations.insert(relation.partners(), flags) {
            self.forget(previous);
        } else {
            self.summary.relation_count += 1;
        }
        self.summary.wedding_count += usize::from(flags.is_wedding);
        self.summary.ended_count += usize::from(flags.has_ended);
    }

    fn remove_relation(&mut self, partners: &PartnerPair) {
        if let Some(previous) = self.relations.remove(partners) {
            self.summary.relation_count -= 1;
            self.forget(previous);
        }
    }

    fn forget(&mut self, flags: RelationFlags) {
        self.summary.wedding_count -= usize::from(flags.is_wedding);
        self.summary.ended_count -= usize::from(flags.has_ended);
    }
}

impl FamilyProjection for FamilySummaryProjection {
    fn handle_family_event(&mut self, event: &FamilyDomainEvent) {
        match event {
            FamilyDomainEvent::FamilyRenamed(renamed) => {
                self.summary.name = renamed.new_name.clone();
            }
            FamilyDomainEvent::MemberAdded(_) => {
                self.summary.member_count += 1;
            }
            FamilyDomainEvent::MemberUpdated(_) => {}
            FamilyDomainEvent::MemberRemoved(removed) => {
                self.summary.member_count = self.summary.member_count.saturating_sub(1);
                for partners in &removed.removed_relations {
                    self.remove_relation(partners);
                }
            }
            FamilyDomainEvent::RelationAdded(added) => {
                self.insert_relation(&added.relation);
            }
            FamilyDomainEvent::RelationUpdated(updated) => {
                self.insert_relation(&updated.relation);
            }
            FamilyDomainEvent::RelationRemoved(removed) => {
                self.remove_relation(&removed.partners);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{FamilyMember, MemberDetails, RelationshipDetails};
    use crate::commands::FamilyCommand;
    use crate::value_objects::MemberId;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     S[Summary Projection] --> M[Member Counts]
    ///     S --> R[Relation Counts]
    ///     S --> C[Cascade Events]
    ///     S --> F[Seeding From Family]
    /// ```

    fn apply(family: &mut Family, projection: &mut FamilySummaryProjection, command: FamilyCommand) {
        for event in family.handle_command(command).unwrap() {
            projection.handle_family_event(&event);
        }
    }

    fn add(family: &mut Family, projection: &mut FamilySummaryProjection) -> MemberId {
        let before = family.counter();
        apply(
            family,
            projection,
            FamilyCommand::AddMember {
                member: FamilyMember::new(MemberDetails::default()),
            },
        );
        MemberId::new(before)
    }

    #[test]
    fn test_summary_follows_commands() {
        let mut family = Family::new("Summary");
        let mut projection = FamilySummaryProjection::from_family(&family);

        let a = add(&mut family, &mut projection);
        let b = add(&mut family, &mut projection);
        let c = add(&mut family, &mut projection);

        let wedding = Relationship::new(
            a,
            b,
            RelationshipDetails {
                is_wedding: true,
                ..Default::default()
            },
            [],
        )
        .unwrap();
        apply(&mut family, &mut projection, FamilyCommand::AddRelation { relation: wedding.clone() });
        apply(&mut family, &mut projection, FamilyCommand::AddRelation { relation: wedding.clone() });

        let ongoing = Relationship::new(b, c, RelationshipDetails::default(), []).unwrap();
        apply(&mut family, &mut projection, FamilyCommand::AddRelation { relation: ongoing.clone() });
        let ended = ongoing
            .revised(
                RelationshipDetails {
                    has_ended: true,
                    ..Default::default()
                },
                [],
            )
            .unwrap();
        apply(&mut family, &mut projection, FamilyCommand::UpdateRelation { relation: ended });

        assert_eq!(
            projection.summary(),
            &FamilySummary {
                name: "Summary".to_string(),
                member_count: 3,
                relation_count: 2,
                wedding_count: 1,
                ended_count: 1,
            }
        );

        apply(&mut family, &mut projection, FamilyCommand::RemoveMember { member_id: b });
        assert_eq!(projection.summary().member_count, 2);
        assert_eq!(projection.summary().relation_count, 0);
        assert_eq!(projection.summary().wedding_count, 0);
        assert_eq!(projection.summary().ended_count, 0);

        apply(&mut family, &mut projection, FamilyCommand::Rename { name: "Renamed".to_string() });
        assert_eq!(projection.summary(), FamilySummaryProjection::from_family(&family).summary());
    }

    #[test]
    fn test_summary_follows_relation_removal() {
        let mut family = Family::new("Summary");
        let mut projection = FamilySummaryProjection::from_family(&family);

        let a = add(&mut family, &mut projection);
        let b = add(&mut family, &mut projection);
        let c = add(&mut family, &mut projection);

        let wedding = Relationship::new(
            a,
            b,
            RelationshipDetails {
                is_wedding: true,
                end_date: chrono::NaiveDate::from_ymd_opt(1999, 1, 1),
                ..Default::default()
            },
            [c],
        )
        .unwrap();
        let other = Relationship::new(a, c, RelationshipDetails::default(), []).unwrap();
        apply(&mut family, &mut projection, FamilyCommand::AddRelation { relation: wedding.clone() });
        apply(&mut family, &mut projection, FamilyCommand::AddRelation { relation: other });
        assert_eq!(projection.summary().relation_count, 2);
        assert_eq!(projection.summary().wedding_count, 1);
        assert_eq!(projection.summary().ended_count, 1);

        let partners = wedding.partners();
        apply(&mut family, &mut projection, FamilyCommand::RemoveRelation { partners });
        apply(&mut family, &mut projection, FamilyCommand::RemoveRelation { partners });

        assert_eq!(
            projection.summary(),
            &FamilySummary {
                name: "Summary".to_string(),
                member_count: 3,
                relation_count: 1,
                wedding_count: 0,
                ended_count: 0,
            }
        );
        assert_eq!(projection.summary(), FamilySummaryProjection::from_family(&family).summary());
    }
}
