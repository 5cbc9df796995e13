use crate::pattern::Pattern;
use crate::pattern::members::Members;

/// An array whose entries are all materialized.
///
/// The array's type name is the element type name; entries are usually clones
/// of one instantiated element, each moved to its own offset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArrayPattern {
    entries: Members,
}

impl ArrayPattern {
    pub fn new() -> Self {
        ArrayPattern::default()
    }

    pub fn entries(&self) -> &Members {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Members {
        &mut self.entries
    }

    pub(crate) fn node_at(&self, offset: u64) -> Option<&Pattern> {
        self.entries.iter().find_map(|entry| entry.node_at(offset))
    }
}
