//! Lineage view
//!
//! A directed parent -> child graph built from a family, used to walk
//! ancestors and descendants without rescanning every relation.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed, Walker};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use crate::aggregate::Family;
use crate::value_objects::MemberId;

/// Parent/child structure of a family at one point in time
///
/// The view is a copy: later changes to the family are not reflected. Build a
/// new one after mutating.
#[derive(Debug, Clone, Default)]
pub struct Lineage {
    graph: DiGraph<MemberId, ()>,
    nodes: HashMap<MemberId, NodeIndex>,
}

impl Lineage {
    /// Build the lineage of every member of `family`
    pub fn from_family(family: &Family) -> Self {
        let mut lineage = Self::default();

        for member in family.get_all_members() {
            let node = lineage.graph.add_node(member.id());
            lineage.nodes.insert(member.id(), node);
        }

        for relation in family.get_all_relations() {
            let partners = relation.partners();
            for child in relation.children() {
                let Some(&child_node) = lineage.nodes.get(child) else {
                    continue;
                };
                for parent in [partners.low(), partners.high()] {
                    if let Some(&parent_node) = lineage.nodes.get(&parent) {
                        lineage.graph.add_edge(parent_node, child_node, ());
                    }
                }
            }
        }

        tracing::trace!(
            "Lineage built: {} members, {} parent links",
            lineage.graph.node_count(),
            lineage.graph.edge_count()
        );
        lineage
    }

    /// Number of members in the view
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: MemberId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Direct parents of a member; empty for an unknown member
    pub fn parents(&self, id: MemberId) -> BTreeSet<MemberId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct children of a member, across all of their relations
    pub fn children(&self, id: MemberId) -> BTreeSet<MemberId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Members sharing at least one parent with `id`, excluding `id`
    pub fn siblings(&self, id: MemberId) -> BTreeSet<MemberId> {
        let mut siblings: BTreeSet<MemberId> = self
            .parents(id)
            .into_iter()
            .flat_map(|parent| self.children(parent))
            .collect();
        siblings.remove(&id);
        siblings
    }

    /// Every member reachable by following parent links upwards
    pub fn ancestors(&self, id: MemberId) -> BTreeSet<MemberId> {
        let Some(&start) = self.nodes.get(&id) else {
            return BTreeSet::new();
        };
        let reversed = Reversed(&self.graph);
        Bfs::new(reversed, start)
            .iter(reversed)
            .filter(|node| *node != start)
            .map(|node| self.graph[node])
            .collect()
    }

    /// Every member reachable by following child links downwards
    pub fn descendants(&self, id: MemberId) -> BTreeSet<MemberId> {
        let Some(&start) = self.nodes.get(&id) else {
            return BTreeSet::new();
        };
        Bfs::new(&self.graph, start)
            .iter(&self.graph)
            .filter(|node| *node != start)
            .map(|node| self.graph[node])
            .collect()
    }

    /// Members without known parents
    pub fn roots(&self) -> BTreeSet<MemberId> {
        self.graph
            .node_indices()
            .filter(|node| {
                self.graph
                    .neighbors_directed(*node, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|node| self.graph[node])
            .collect()
    }

    fn neighbors(&self, id: MemberId, direction: Direction) -> BTreeSet<MemberId> {
        self.nodes
            .get(&id)
            .map(|node| {
                self.graph
                    .neighbors_directed(*node, direction)
                    .map(|neighbor| self.graph[neighbor])
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{FamilyMember, MemberDetails, Relationship, RelationshipDetails};

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     L[Lineage] --> P[Parents & Children]
    ///     L --> S[Siblings]
    ///     L --> A[Ancestors]
    ///     L --> D[Descendants]
    ///     L --> R[Roots]
    /// ```

    fn id(raw: i64) -> MemberId {
        MemberId::new(raw)
    }

    /// Three generations:
    ///
    /// ```text
    /// 0 + 1 -> 2, 3
    /// 2 + 4 -> 5
    /// 3 + 6 -> 7
    /// 4 + 8 -> 9   (half-sibling of 5)
    /// ```
    fn three_generations() -> Family {
        let mut family = Family::new("Lineage");
        for _ in 0..10 {
            family.add_member(&FamilyMember::new(MemberDetails::default())).unwrap();
        }
        let unions: [(i64, i64, &[i64]); 4] =
            [(0, 1, &[2, 3]), (2, 4, &[5]), (3, 6, &[7]), (4, 8, &[9])];
        for (a, b, children) in unions {
            let relation = Relationship::new(
                id(a),
                id(b),
                RelationshipDetails::default(),
                children.iter().copied().map(id),
            )
            .unwrap();
            family.add_relation(&relation).unwrap();
        }
        family
    }

    fn ids(raw: &[i64]) -> BTreeSet<MemberId> {
        raw.iter().copied().map(id).collect()
    }

    #[test]
    fn test_parents_and_children() {
        let lineage = Lineage::from_family(&three_generations());

        assert_eq!(lineage.len(), 10);
        assert_eq!(lineage.parents(id(5)), ids(&[2, 4]));
        assert_eq!(lineage.children(id(0)), ids(&[2, 3]));
        assert_eq!(lineage.children(id(4)), ids(&[5, 9]));
        assert!(lineage.parents(id(0)).is_empty());
        assert!(lineage.parents(id(42)).is_empty());
    }

    #[test]
    fn test_siblings() {
        let lineage = Lineage::from_family(&three_generations());

        assert_eq!(lineage.siblings(id(2)), ids(&[3]));
        assert_eq!(lineage.siblings(id(5)), ids(&[9]));
        assert!(lineage.siblings(id(7)).is_empty());
        assert!(lineage.siblings(id(0)).is_empty());
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let lineage = Lineage::from_family(&three_generations());

        assert_eq!(lineage.ancestors(id(5)), ids(&[0, 1, 2, 4]));
        assert_eq!(lineage.ancestors(id(7)), ids(&[0, 1, 3, 6]));
        assert_eq!(lineage.descendants(id(0)), ids(&[2, 3, 5, 7]));
        assert_eq!(lineage.descendants(id(4)), ids(&[5, 9]));
        assert!(lineage.descendants(id(9)).is_empty());
        assert!(lineage.ancestors(id(42)).is_empty());
    }

    #[test]
    fn test_roots() {
        let lineage = Lineage::from_family(&three_generations());
        assert_eq!(lineage.roots(), ids(&[0, 1, 4, 6, 8]));
    }

    #[test]
    fn test_view_is_a_copy() {
        let mut family = three_generations();
        let lineage = Lineage::from_family(&family);

        family.remove_member(id(2));

        assert!(lineage.contains(id(2)));
        assert!(!Lineage::from_family(&family).contains(id(2)));
        assert!(Lineage::from_family(&family).ancestors(id(5)).is_empty());
    }
}
