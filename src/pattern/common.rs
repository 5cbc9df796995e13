//! State shared by every pattern variant.

use hashbrown::HashMap as FastMap;
use std::fmt;

/// Every byte address a pattern claims, mapped to the color it is painted with.
pub type HighlightMap = FastMap<u64, Color>;

/// Display color of a pattern, stored as packed `0xAABBGGRR`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const NONE: Color = Color(0);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Byte order a pattern's value is decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

impl Default for Endian {
    fn default() -> Self {
        Endian::native()
    }
}

bitflags::bitflags! {
    /// Per-pattern markers.
    ///
    /// `COLOR_OVERRIDDEN` and `ENDIAN_OVERRIDDEN` pin the property so that a
    /// parent propagating its own color or byte order leaves it alone.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct PatternFlags: u8 {
        const HIDDEN = 1 << 0;
        const INLINED = 1 << 1;
        const COLOR_OVERRIDDEN = 1 << 2;
        const ENDIAN_OVERRIDDEN = 1 << 3;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Common {
    pub(crate) offset: u64,
    pub(crate) size: u64,
    pub(crate) color: Color,
    pub(crate) endian: Endian,
    pub(crate) flags: PatternFlags,
    pub(crate) type_name: String,
    pub(crate) variable_name: String,
    pub(crate) display_name: Option<String>,
    pub(crate) comment: Option<String>,
}

impl Common {
    pub(crate) fn new(type_name: String, offset: u64, size: u64) -> Self {
        Common {
            offset,
            size,
            color: Color::NONE,
            endian: Endian::native(),
            flags: PatternFlags::empty(),
            type_name,
            variable_name: String::new(),
            display_name: None,
            comment: None,
        }
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.flags.contains(PatternFlags::HIDDEN)
    }

    /// Last address covered, inclusive. Zero-sized patterns end where they start.
    pub(crate) fn end_address(&self) -> u64 {
        self.offset.saturating_add(self.size.saturating_sub(1))
    }

    /// Whether `address` falls inside `[offset, offset + size)`.
    pub(crate) fn contains(&self, address: u64) -> bool {
        address >= self.offset && address - self.offset < self.size
    }

    /// Claims every address from `offset` through the inclusive end address.
    /// Addresses already claimed keep their first color. Visibility is checked
    /// by the caller.
    pub(crate) fn highlight_own(&self, highlight: &mut HighlightMap) {
        for address in self.offset..=self.end_address() {
            highlight.entry(address).or_insert(self.color);
        }
    }

    /// Properties compared by structural equality. Color, display name and
    /// the inlined marker are not part of it.
    pub(crate) fn same_properties(&self, other: &Common) -> bool {
        self.offset == other.offset
            && self.size == other.size
            && self.endian == other.endian
            && self.is_hidden() == other.is_hidden()
            && self.variable_name == other.variable_name
            && self.type_name == other.type_name
            && self.comment == other.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_address_of_zero_sized_pattern_clamps_to_start() {
        let common = Common::new("u8".to_owned(), 0x10, 0);
        assert_eq!(common.end_address(), 0x10);

        let at_zero = Common::new("u8".to_owned(), 0, 0);
        assert_eq!(at_zero.end_address(), 0);
    }

    #[test]
    fn test_end_address_saturates_at_top_of_address_space() {
        let common = Common::new("u64".to_owned(), u64::MAX - 1, 8);
        assert_eq!(common.end_address(), u64::MAX);
        assert!(common.contains(u64::MAX));
    }

    #[test]
    fn test_contains_is_half_open() {
        let common = Common::new("u32".to_owned(), 4, 4);
        assert!(!common.contains(3));
        assert!(common.contains(4));
        assert!(common.contains(7));
        assert!(!common.contains(8));

        let empty = Common::new("u8".to_owned(), 4, 0);
        assert!(!empty.contains(4));
    }

    #[test]
    fn test_highlight_own_keeps_first_color() {
        let mut highlight = HighlightMap::new();
        let mut first = Common::new("u16".to_owned(), 0, 2);
        first.color = Color(1);
        let mut second = Common::new("u8".to_owned(), 1, 1);
        second.color = Color(2);

        first.highlight_own(&mut highlight);
        second.highlight_own(&mut highlight);

        assert_eq!(highlight.len(), 2);
        assert_eq!(highlight[&1], Color(1));
    }

    #[test]
    fn test_color_from_rgb_packs_abgr() {
        assert_eq!(Color::from_rgb(0x11, 0x22, 0x33), Color(0xFF33_2211));
        assert_eq!(Color(0xFF33_2211).to_string(), "#FF332211");
    }
}
