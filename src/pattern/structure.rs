use crate::pattern::Pattern;
use crate::pattern::members::Members;

/// Members laid out one after another.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StructPattern {
    members: Members,
}

impl StructPattern {
    pub fn new() -> Self {
        StructPattern::default()
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut Members {
        &mut self.members
    }

    /// First member, in declaration order, that claims `offset`.
    pub(crate) fn node_at(&self, offset: u64) -> Option<&Pattern> {
        self.members.iter().find_map(|member| member.node_at(offset))
    }
}
