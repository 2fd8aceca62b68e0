//! Eligible-children filter

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::aggregate::{Family, FamilyMember, Relationship};
use crate::value_objects::MemberId;

/// Members that may be attached as children of `relation`
///
/// Without a relation, or if one of its partners is not a member, every
/// member is eligible. Otherwise the candidates are all members except:
/// - the two partners;
/// - members not born strictly after the younger partner, when that partner's
///   birth date is known (a candidate without birth date stays eligible);
/// - members already children of `relation`;
/// - members that already have parents in any relation.
pub fn potential_children(family: &Family, relation: Option<&Relationship>) -> BTreeSet<FamilyMember> {
    let mut candidates = family.get_all_members();

    let Some(relation) = relation else {
        return candidates;
    };
    let (Some(partner1), Some(partner2)) = (
        family.get_member(relation.partner1()),
        family.get_member(relation.partner2()),
    ) else {
        return candidates;
    };

    candidates.remove(&partner1);
    candidates.remove(&partner2);

    if let Some(youngest) = youngest_partner(&partner1, &partner2) {
        candidates.retain(|candidate| {
            candidate
                .compare_birthdays(youngest)
                .map_or(true, |order| order == Ordering::Greater)
        });
    }

    let with_parents: HashSet<MemberId> = family
        .get_all_relations()
        .iter()
        .flat_map(|r| r.children().iter().copied())
        .collect();
    candidates.retain(|candidate| {
        !relation.is_child(candidate.id()) && !with_parents.contains(&candidate.id())
    });

    candidates
}

/// The partner used as birth-order reference
///
/// With both birth dates known this is the one born last (the second partner
/// on a tie). With a single known birth date it is that partner. `None` if
/// neither birth date is known.
pub fn youngest_partner<'a>(
    partner1: &'a FamilyMember,
    partner2: &'a FamilyMember,
) -> Option<&'a FamilyMember> {
    match (partner1.birth_date(), partner2.birth_date()) {
        (Some(_), Some(_)) => match partner1.compare_birthdays(partner2) {
            Some(Ordering::Greater) => Some(partner1),
            _ => Some(partner2),
        },
        (Some(_), None) => Some(partner1),
        (None, Some(_)) => Some(partner2),
        (None, None) => None,
    }
}
