//! Family queries
//!
//! Derived, read-only computations over a family. They never mutate the
//! aggregate and only work on the copies it hands out.

mod member_info;
mod potential_children;

pub use member_info::{
    all_member_infos, all_relation_infos, member_info, relation_info, MemberInfo, RelationInfo,
};
pub use potential_children::{potential_children, youngest_partner};
