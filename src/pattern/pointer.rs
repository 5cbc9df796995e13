use crate::pattern::Pattern;

/// A pointer owns the pattern it points at. The pointer's own offset and size
/// describe the address bytes; the pointee lives wherever the address led.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerPattern {
    pointee: Box<Pattern>,
}

impl PointerPattern {
    pub fn new(pointee: Pattern) -> Self {
        PointerPattern {
            pointee: Box::new(pointee),
        }
    }

    pub fn pointee(&self) -> &Pattern {
        &self.pointee
    }

    pub fn pointee_mut(&mut self) -> &mut Pattern {
        &mut self.pointee
    }

    /// Address the pointer resolved to.
    pub fn address(&self) -> u64 {
        self.pointee.offset()
    }

    /// Shift the pointee by the same distance the pointer moves.
    pub(crate) fn rebase(&mut self, old_base: u64, new_base: u64) {
        let relative = self.pointee.offset().wrapping_sub(old_base);
        self.pointee.set_offset(new_base.wrapping_add(relative));
    }

    pub(crate) fn format_value(&self) -> String {
        format!("*(0x{:X})", self.address())
    }
}
