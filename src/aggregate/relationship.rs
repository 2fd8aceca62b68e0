//! Relationship entity
//!
//! A relationship is a union between two distinct members, optionally a
//! wedding, optionally ended, and optionally carrying children.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::commands::{FamilyCommandError, FamilyCommandResult};
use crate::value_objects::{MemberId, PartnerPair};

/// Descriptive data of a relationship
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDetails {
    /// When the union started
    pub date: Option<NaiveDate>,
    /// Where the union started
    pub location: Option<String>,
    /// Whether the union is a wedding
    #[serde(default)]
    pub is_wedding: bool,
    /// Whether the union has ended
    #[serde(default)]
    pub has_ended: bool,
    /// When the union ended
    pub end_date: Option<NaiveDate>,
}

/// A union between two members
///
/// Equality and hashing only look at the unordered pair of partners, so a
/// relation between 1 and 2 equals a relation between 2 and 1 whatever the
/// rest of their data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RelationshipRecord", into = "RelationshipRecord")]
pub struct Relationship {
    partner1: MemberId,
    partner2: MemberId,
    partners: PartnerPair,
    children: BTreeSet<MemberId>,
    date: Option<NaiveDate>,
    location: Option<String>,
    is_wedding: bool,
    has_ended: bool,
    end_date: Option<NaiveDate>,
}

impl Relationship {
    /// Create a relationship
    ///
    /// Fails if both partners are the same member, or if a child is one of
    /// the partners or is listed twice.
    pub fn new(
        partner1: MemberId,
        partner2: MemberId,
        details: RelationshipDetails,
        children: impl IntoIterator<Item = MemberId>,
    ) -> FamilyCommandResult<Self> {
        let partners = PartnerPair::new(partner1, partner2)
            .ok_or(FamilyCommandError::SelfRelationship(partner1))?;

        let mut relation = Self {
            partner1,
            partner2,
            partners,
            children: BTreeSet::new(),
            date: details.date,
            location: details.location,
            is_wedding: details.is_wedding,
            has_ended: false,
            end_date: None,
        };
        relation.set_end_date(details.end_date);
        relation.set_has_ended(details.has_ended);

        for child in children {
            relation.add_child(child)?;
        }

        Ok(relation)
    }

    /// First partner, as given at creation
    pub fn partner1(&self) -> MemberId {
        self.partner1
    }

    /// Second partner, as given at creation
    pub fn partner2(&self) -> MemberId {
        self.partner2
    }

    /// The unordered pair identifying this relationship
    pub fn partners(&self) -> PartnerPair {
        self.partners
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_wedding(&self) -> bool {
        self.is_wedding
    }

    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Children IDs, in ascending order
    pub fn children(&self) -> &BTreeSet<MemberId> {
        &self.children
    }

    pub fn is_child(&self, id: MemberId) -> bool {
        self.children.contains(&id)
    }

    /// Whether `id` is one of the two partners
    pub fn is_in_relationship(&self, id: MemberId) -> bool {
        self.partners.contains(id)
    }

    /// Copy of this relationship, same partners, with its data and children
    /// replaced
    ///
    /// This is how an edited relationship is prepared before being handed
    /// back to [`Family::update_relation`](crate::Family::update_relation).
    /// The same rules as [`Relationship::new`] apply.
    pub fn revised(
        &self,
        details: RelationshipDetails,
        children: impl IntoIterator<Item = MemberId>,
    ) -> FamilyCommandResult<Self> {
        Self::new(self.partner1, self.partner2, details, children)
    }

    /// Mark the union as ended or not; ignored when an end date is recorded
    fn set_has_ended(&mut self, has_ended: bool) {
        if self.end_date.is_none() {
            self.has_ended = has_ended;
        }
    }

    /// Set or clear the end date; the ended flag follows it
    fn set_end_date(&mut self, end_date: Option<NaiveDate>) {
        self.has_ended = end_date.is_some();
        self.end_date = end_date;
    }

    /// Add a child
    ///
    /// The child must differ from both partners and not be listed already.
    fn add_child(&mut self, id: MemberId) -> FamilyCommandResult<()> {
        if self.partners.contains(id) {
            return Err(FamilyCommandError::ChildIsPartner {
                child: id,
                partners: self.partners,
            });
        }
        if !self.children.insert(id) {
            return Err(FamilyCommandError::DuplicateChild {
                child: id,
                partners: self.partners,
            });
        }
        Ok(())
    }

    /// Remove a child; does nothing if absent
    pub(crate) fn remove_child(&mut self, id: MemberId) {
        self.children.remove(&id);
    }

    /// Descriptive data of the relationship
    pub fn details(&self) -> RelationshipDetails {
        RelationshipDetails {
            date: self.date,
            location: self.location.clone(),
            is_wedding: self.is_wedding,
            has_ended: self.has_ended,
            end_date: self.end_date,
        }
    }

    /// Whether both values carry exactly the same data
    pub fn same_data(&self, other: &Relationship) -> bool {
        self.partner1 == other.partner1
            && self.partner2 == other.partner2
            && self.children == other.children
            && self.details() == other.details()
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.partners == other.partners
    }
}

impl Eq for Relationship {}

impl Hash for Relationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.partners.hash(state);
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.partner1, self.partner2)
    }
}

/// Serialized shape of a relationship, validated on the way in
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelationshipRecord {
    partner1: MemberId,
    partner2: MemberId,
    #[serde(default)]
    children: Vec<MemberId>,
    #[serde(flatten)]
    details: RelationshipDetails,
}

impl TryFrom<RelationshipRecord> for Relationship {
    type Error = FamilyCommandError;

    fn try_from(record: RelationshipRecord) -> Result<Self, Self::Error> {
        Relationship::new(record.partner1, record.partner2, record.details, record.children)
    }
}

impl From<Relationship> for RelationshipRecord {
    fn from(relation: Relationship) -> Self {
        let details = relation.details();
        RelationshipRecord {
            partner1: relation.partner1,
            partner2: relation.partner2,
            children: relation.children.into_iter().collect(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     R[Relationship] --> V[Validation]
    ///     R --> C[Children]
    ///     R --> E[End Date Rules]
    ///     R --> I[Pair Identity]
    ///     R --> S[Serialization]
    /// ```

    fn id(raw: i64) -> MemberId {
        MemberId::new(raw)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn union(a: i64, b: i64, children: &[i64]) -> Relationship {
        Relationship::new(
            id(a),
            id(b),
            RelationshipDetails::default(),
            children.iter().copied().map(id),
        )
        .unwrap()
    }

    #[test]
    fn test_self_relationship_rejected() {
        let result = Relationship::new(id(5), id(5), RelationshipDetails::default(), []);
        assert_eq!(result.unwrap_err(), FamilyCommandError::SelfRelationship(id(5)));
    }

    #[test]
    fn test_children_validation() {
        let mut relation = union(1, 2, &[3]);

        assert!(matches!(
            relation.add_child(id(1)),
            Err(FamilyCommandError::ChildIsPartner { .. })
        ));
        assert!(matches!(
            relation.add_child(id(3)),
            Err(FamilyCommandError::DuplicateChild { .. })
        ));
        relation.add_child(id(4)).unwrap();

        assert!(relation.is_child(id(3)));
        assert!(relation.is_child(id(4)));
        assert!(!relation.is_child(id(2)));

        relation.remove_child(id(3));
        relation.remove_child(id(3));
        assert_eq!(relation.children().iter().copied().collect::<Vec<_>>(), vec![id(4)]);
    }

    #[test]
    fn test_construction_rejects_invalid_children() {
        let result = Relationship::new(id(1), id(2), RelationshipDetails::default(), [id(3), id(3)]);
        assert!(matches!(result, Err(FamilyCommandError::DuplicateChild { .. })));

        let result = Relationship::new(id(1), id(2), RelationshipDetails::default(), [id(2)]);
        assert!(matches!(result, Err(FamilyCommandError::ChildIsPartner { .. })));
    }

    #[test]
    fn test_end_date_governs_has_ended() {
        let mut relation = union(1, 2, &[]);
        assert!(!relation.has_ended());

        relation.set_has_ended(true);
        assert!(relation.has_ended());
        relation.set_has_ended(false);
        assert!(!relation.has_ended());

        relation.set_end_date(Some(date(2001, 1, 1)));
        assert!(relation.has_ended());
        relation.set_has_ended(false);
        assert!(relation.has_ended());

        relation.set_end_date(None);
        assert!(!relation.has_ended());
    }

    #[test]
    fn test_construction_with_end_date_ignores_flag() {
        let relation = Relationship::new(
            id(1),
            id(2),
            RelationshipDetails {
                has_ended: false,
                end_date: Some(date(1999, 5, 1)),
                ..Default::default()
            },
            [],
        )
        .unwrap();

        assert!(relation.has_ended());
        assert_eq!(relation.end_date(), Some(date(1999, 5, 1)));
    }

    #[test]
    fn test_identity_is_unordered_pair() {
        let a = union(1, 2, &[3]);
        let b = union(2, 1, &[])
            .revised(
                RelationshipDetails {
                    is_wedding: true,
                    ..Default::default()
                },
                [],
            )
            .unwrap();

        assert_eq!(a, b);
        assert!(!a.same_data(&b));

        let set: HashSet<Relationship> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(union(1, 2, &[]), union(1, 3, &[]));
    }

    #[test]
    fn test_revised_keeps_partners_and_validates() {
        let relation = union(4, 2, &[5]);
        let details = RelationshipDetails {
            date: Some(date(1990, 6, 2)),
            is_wedding: true,
            end_date: Some(date(2000, 1, 1)),
            ..Default::default()
        };

        let revised = relation.revised(details.clone(), [id(6)]).unwrap();
        assert_eq!(revised, relation);
        assert_eq!((revised.partner1(), revised.partner2()), (id(4), id(2)));
        assert_eq!(revised.children().iter().copied().collect::<Vec<_>>(), vec![id(6)]);
        assert_eq!(revised.details(), RelationshipDetails { has_ended: true, ..details });
        assert!(relation.is_child(id(5)));
        assert!(!relation.is_wedding());

        assert!(matches!(
            relation.revised(RelationshipDetails::default(), [id(2)]),
            Err(FamilyCommandError::ChildIsPartner { .. })
        ));
    }

    #[test]
    fn test_is_in_relationship() {
        let relation = union(7, 9, &[]);
        assert!(relation.is_in_relationship(id(7)));
        assert!(relation.is_in_relationship(id(9)));
        assert!(!relation.is_in_relationship(id(8)));
        assert_eq!(relation.to_string(), "7 <-> 9");
    }

    #[test]
    fn test_serialization() {
        let relation = Relationship::new(
            id(4),
            id(2),
            RelationshipDetails {
                date: Some(date(1990, 6, 2)),
                location: Some("Lyon".to_string()),
                is_wedding: true,
                has_ended: true,
                end_date: None,
            },
            [id(6), id(5)],
        )
        .unwrap();

        let serialized = serde_json::to_string(&relation).unwrap();
        let deserialized: Relationship = serde_json::from_str(&serialized).unwrap();
        assert!(relation.same_data(&deserialized));
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"{"partner1":3,"partner2":3,"children":[]}"#;
        assert!(serde_json::from_str::<Relationship>(json).is_err());

        let json = r#"{"partner1":1,"partner2":2,"children":[1]}"#;
        assert!(serde_json::from_str::<Relationship>(json).is_err());

        let json = r#"{"partner1":1,"partner2":2}"#;
        let relation: Relationship = serde_json::from_str(json).unwrap();
        assert!(relation.children().is_empty());
        assert!(!relation.is_wedding());
    }
}
