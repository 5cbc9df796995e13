//! Union patterns.
//!
//! Every member of a union starts at the union's own offset and describes the
//! same bytes in a different way. The evaluator sizes the union to its widest
//! member; that member is the canonical interpretation when resolving an
//! address back to a pattern.

use crate::pattern::Pattern;
use crate::pattern::members::Members;

use log::trace;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UnionPattern {
    members: Members,
}

impl UnionPattern {
    pub fn new() -> Self {
        UnionPattern::default()
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }

    /// The first member, in declaration order, whose size equals `union_size`.
    ///
    /// A member that is merely the largest but does not match the union's size
    /// is never picked.
    pub fn largest_member(&self, union_size: u64) -> Option<&Pattern> {
        self.members.iter().find(|member| member.size() == union_size)
    }

    pub(crate) fn node_at(&self, union_size: u64, offset: u64) -> Option<&Pattern> {
        match self.largest_member(union_size) {
            Some(member) => member.node_at(offset),
            None => {
                trace!(
                    "No union member matches the union size {}, lookup of 0x{:X} misses",
                    union_size, offset
                );
                None
            }
        }
    }
}
