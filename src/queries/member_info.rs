//! Read models for member and relation lists

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Family, Relationship};
use crate::value_objects::{Gender, MemberId, PartnerPair, Period};

/// Member information for query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub member_id: MemberId,
    pub display_name: String,
    pub gender: Gender,
    pub age: Option<Period>,
    pub is_deceased: bool,
    pub parents: Option<PartnerPair>,
    pub partners: Vec<MemberId>,
}

/// Relation information for query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationInfo {
    pub partners: PartnerPair,
    /// `"{partner1} & {partner2}"`, using member display names
    pub label: String,
    pub is_wedding: bool,
    pub has_ended: bool,
    pub children: Vec<MemberId>,
}

/// Describe one member, computing the age as of `reference`
pub fn member_info(family: &Family, member_id: MemberId, reference: NaiveDate) -> Option<MemberInfo> {
    let member = family.get_member(member_id)?;

    Some(MemberInfo {
        member_id,
        display_name: member.to_string(),
        gender: member.gender(),
        age: member.age(reference),
        is_deceased: member.death_date().is_some(),
        parents: family.parents_of(member_id),
        partners: family
            .get_relations(member_id)
            .iter()
            .filter_map(|relation| relation.partners().other(member_id))
            .collect(),
    })
}

/// Describe every member, ordered by ID
pub fn all_member_infos(family: &Family, reference: NaiveDate) -> Vec<MemberInfo> {
    family
        .get_all_members()
        .iter()
        .filter_map(|member| member_info(family, member.id(), reference))
        .collect()
}

/// Describe one relation
pub fn relation_info(family: &Family, relation: &Relationship) -> RelationInfo {
    let name_of = |id: MemberId| {
        family
            .get_member(id)
            .map(|member| member.to_string())
            .unwrap_or_else(|| "?".to_string())
    };

    RelationInfo {
        partners: relation.partners(),
        label: format!("{} & {}", name_of(relation.partner1()), name_of(relation.partner2())),
        is_wedding: relation.is_wedding(),
        has_ended: relation.has_ended(),
        children: relation.children().iter().copied().collect(),
    }
}

/// Describe every relation, in insertion order
pub fn all_relation_infos(family: &Family) -> Vec<RelationInfo> {
    family
        .get_all_relations()
        .iter()
        .map(|relation| relation_info(family, relation))
        .collect()
}
