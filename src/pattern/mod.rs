//! The pattern tree.
//!
//! A [`Pattern`] describes one typed region of the byte source. Every variant
//! shares the same base state (offset, size, color, byte order, names, flags);
//! the variant-specific part lives in [`PatternKind`].
//!
//! Trees are built bottom-up by the evaluator and are read-mostly afterwards.
//! The only mutations are whole-tree passes:
//! - [`Pattern::set_offset`] moves a pattern and all of its owned children by the same distance.
//! - [`Pattern::set_color`] / [`Pattern::set_endian`] cascade to children that
//!   did not pin their own value with [`Pattern::override_color`] /
//!   [`Pattern::override_endian`].
//! - [`Pattern::sort`] reorders presentation order only.

mod array;
mod bitfield;
mod common;
mod enumeration;
mod members;
mod pointer;
mod primitive;
mod structure;
mod union;

pub use self::array::ArrayPattern;
pub use self::bitfield::{BitfieldField, BitfieldPattern};
pub use self::common::{Color, Endian, HighlightMap, PatternFlags};
pub use self::enumeration::{EnumEntry, EnumPattern};
pub use self::members::Members;
pub use self::pointer::PointerPattern;
pub use self::primitive::PrimitiveKind;
pub use self::structure::StructPattern;
pub use self::union::UnionPattern;

use self::common::Common;
use crate::err::Result;
use crate::provider::ByteProvider;
use crate::sort::SortSpec;

use log::trace;

#[derive(Debug, Clone)]
pub enum PatternKind {
    Primitive(PrimitiveKind),
    Enum(EnumPattern),
    Bitfield(BitfieldPattern),
    Pointer(PointerPattern),
    Struct(StructPattern),
    Union(UnionPattern),
    Array(ArrayPattern),
}

/// A node of the decoded layout tree.
///
/// `Clone` is a deep copy: every owned child is cloned as well, so the copy can
/// be moved or recolored without affecting the original.
#[derive(Debug, Clone)]
pub struct Pattern {
    common: Common,
    kind: PatternKind,
}

impl Pattern {
    pub fn new(kind: PatternKind, type_name: impl Into<String>, offset: u64, size: u64) -> Self {
        Pattern {
            common: Common::new(type_name.into(), offset, size),
            kind,
        }
    }

    pub fn primitive(kind: PrimitiveKind, offset: u64, size: u64) -> Self {
        Pattern::new(PatternKind::Primitive(kind), kind.type_name(size), offset, size)
    }

    pub fn unsigned(offset: u64, size: u64) -> Self {
        Pattern::primitive(PrimitiveKind::Unsigned, offset, size)
    }

    pub fn signed(offset: u64, size: u64) -> Self {
        Pattern::primitive(PrimitiveKind::Signed, offset, size)
    }

    pub fn float(offset: u64, size: u64) -> Self {
        Pattern::primitive(PrimitiveKind::Float, offset, size)
    }

    pub fn boolean(offset: u64) -> Self {
        Pattern::primitive(PrimitiveKind::Boolean, offset, 1)
    }

    pub fn character(offset: u64, size: u64) -> Self {
        Pattern::primitive(PrimitiveKind::Character, offset, size)
    }

    pub fn enumeration(
        type_name: impl Into<String>,
        offset: u64,
        size: u64,
        entries: Vec<EnumEntry>,
    ) -> Self {
        Pattern::new(PatternKind::Enum(EnumPattern::new(entries)), type_name, offset, size)
    }

    pub fn bitfield(
        type_name: impl Into<String>,
        offset: u64,
        size: u64,
        fields: Vec<BitfieldField>,
    ) -> Self {
        Pattern::new(
            PatternKind::Bitfield(BitfieldPattern::new(fields)),
            type_name,
            offset,
            size,
        )
    }

    /// A pointer whose address bytes are at `offset..offset + size`. The
    /// pointer takes the pointee's type name.
    pub fn pointer(offset: u64, size: u64, pointee: Pattern) -> Self {
        let type_name = pointee.type_name().to_owned();
        Pattern::new(
            PatternKind::Pointer(PointerPattern::new(pointee)),
            type_name,
            offset,
            size,
        )
    }

    pub fn structure(type_name: impl Into<String>, offset: u64, size: u64) -> Self {
        Pattern::new(PatternKind::Struct(StructPattern::new()), type_name, offset, size)
    }

    /// `size` must already be the size of the widest member.
    pub fn union(type_name: impl Into<String>, offset: u64, size: u64) -> Self {
        Pattern::new(PatternKind::Union(UnionPattern::new()), type_name, offset, size)
    }

    /// `element_type` names the type of each entry.
    pub fn array(element_type: impl Into<String>, offset: u64, size: u64) -> Self {
        Pattern::new(PatternKind::Array(ArrayPattern::new()), element_type, offset, size)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.common.variable_name = name.into();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.common.display_name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.common.comment = Some(comment.into());
        self
    }

    /// Pin `color` on this pattern and its unpinned children.
    pub fn with_color(mut self, color: Color) -> Self {
        self.override_color(color);
        self
    }

    /// Pin `endian` on this pattern and its unpinned children.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.override_endian(endian);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.set_hidden(hidden);
        self
    }

    pub fn with_inlined(mut self, inlined: bool) -> Self {
        self.set_inlined(inlined);
        self
    }

    /// Builder form of [`Pattern::replace_members`].
    pub fn with_members<I>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = Option<Pattern>>,
    {
        self.replace_members(members);
        self
    }

    pub fn offset(&self) -> u64 {
        self.common.offset
    }

    pub fn size(&self) -> u64 {
        self.common.size
    }

    /// Last address covered, inclusive. A zero-sized pattern ends at its own
    /// offset rather than wrapping around.
    pub fn end_address(&self) -> u64 {
        self.common.end_address()
    }

    /// `(offset, size)` a presentation layer selects when the pattern is picked.
    pub fn selection(&self) -> (u64, u64) {
        (self.common.offset, self.common.size)
    }

    pub fn color(&self) -> Color {
        self.common.color
    }

    pub fn endian(&self) -> Endian {
        self.common.endian
    }

    pub fn flags(&self) -> PatternFlags {
        self.common.flags
    }

    pub fn has_overridden_color(&self) -> bool {
        self.common.flags.contains(PatternFlags::COLOR_OVERRIDDEN)
    }

    pub fn has_overridden_endian(&self) -> bool {
        self.common.flags.contains(PatternFlags::ENDIAN_OVERRIDDEN)
    }

    pub fn type_name(&self) -> &str {
        &self.common.type_name
    }

    pub fn variable_name(&self) -> &str {
        &self.common.variable_name
    }

    /// Explicit display name if one was set, the variable name otherwise.
    pub fn display_name(&self) -> &str {
        self.common
            .display_name
            .as_deref()
            .unwrap_or(&self.common.variable_name)
    }

    pub fn comment(&self) -> Option<&str> {
        self.common.comment.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.common.is_hidden()
    }

    pub fn is_inlined(&self) -> bool {
        self.common.flags.contains(PatternFlags::INLINED)
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut PatternKind {
        &mut self.kind
    }

    /// Struct, union and array patterns.
    pub fn is_composite(&self) -> bool {
        self.owned_members().is_some()
    }

    pub fn as_union(&self) -> Option<&UnionPattern> {
        match &self.kind {
            PatternKind::Union(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_union_mut(&mut self) -> Option<&mut UnionPattern> {
        match &mut self.kind {
            PatternKind::Union(u) => Some(u),
            _ => None,
        }
    }

    /// Owned children in declaration order. A pointer's only child is its
    /// pointee; other leaves have none.
    pub fn members(&self) -> &[Pattern] {
        match &self.kind {
            PatternKind::Pointer(p) => std::slice::from_ref(p.pointee()),
            _ => self.owned_members().map(Members::as_slice).unwrap_or(&[]),
        }
    }

    /// Owned children in presentation order.
    pub fn sorted_members(&self) -> Vec<&Pattern> {
        match &self.kind {
            PatternKind::Pointer(p) => vec![p.pointee()],
            _ => self
                .owned_members()
                .map(|members| members.iter_sorted().collect())
                .unwrap_or_default(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members().len()
    }

    /// Mutable access to one owned child, by declaration index.
    pub fn member_mut(&mut self, index: usize) -> Option<&mut Pattern> {
        match &mut self.kind {
            PatternKind::Pointer(p) if index == 0 => Some(p.pointee_mut()),
            PatternKind::Struct(s) => s.members_mut().get_mut(index),
            PatternKind::Union(u) => u.members_mut().get_mut(index),
            PatternKind::Array(a) => a.entries_mut().get_mut(index),
            _ => None,
        }
    }

    fn owned_members(&self) -> Option<&Members> {
        match &self.kind {
            PatternKind::Struct(s) => Some(s.members()),
            PatternKind::Union(u) => Some(u.members()),
            PatternKind::Array(a) => Some(a.entries()),
            _ => None,
        }
    }

    fn owned_members_mut(&mut self) -> Option<&mut Members> {
        match &mut self.kind {
            PatternKind::Struct(s) => Some(s.members_mut()),
            PatternKind::Union(u) => Some(u.members_mut()),
            PatternKind::Array(a) => Some(a.entries_mut()),
            _ => None,
        }
    }

    pub fn set_variable_name(&mut self, name: impl Into<String>) {
        self.common.variable_name = name.into();
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.common.display_name = Some(name.into());
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.common.comment = Some(comment.into());
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.common.flags.set(PatternFlags::HIDDEN, hidden);
    }

    pub fn set_inlined(&mut self, inlined: bool) {
        self.common.flags.set(PatternFlags::INLINED, inlined);
    }

    /// Replace all children of a struct, union or array. Absent members are
    /// skipped. Returns the number of children kept, or `None` when the
    /// pattern cannot hold members.
    pub fn replace_members<I>(&mut self, members: I) -> Option<usize>
    where
        I: IntoIterator<Item = Option<Pattern>>,
    {
        match self.owned_members_mut() {
            Some(owned) => Some(owned.replace(members)),
            None => {
                trace!("`{}` has no members, ignoring replacement", self.common.type_name);
                None
            }
        }
    }

    /// Move the pattern to `offset`. Owned children move by the same distance,
    /// so their position relative to this pattern is preserved.
    pub fn set_offset(&mut self, offset: u64) {
        let old = self.common.offset;

        match &mut self.kind {
            PatternKind::Pointer(p) => p.rebase(old, offset),
            PatternKind::Struct(s) => s.members_mut().rebase(old, offset),
            PatternKind::Union(u) => u.members_mut().rebase(old, offset),
            PatternKind::Array(a) => a.entries_mut().rebase(old, offset),
            PatternKind::Primitive(_) | PatternKind::Enum(_) | PatternKind::Bitfield(_) => {}
        }

        self.common.offset = offset;
    }

    /// Set this pattern's color and hand it down to children that have not
    /// pinned their own. Does not pin this pattern.
    pub fn set_color(&mut self, color: Color) {
        self.common.color = color;

        match &mut self.kind {
            PatternKind::Pointer(p) => {
                if !p.pointee().has_overridden_color() {
                    p.pointee_mut().set_color(color);
                }
            }
            _ => {
                if let Some(members) = self.owned_members_mut() {
                    members.inherit_color(color);
                }
            }
        }
    }

    /// Pin `color` on this pattern so that a parent's [`Pattern::set_color`]
    /// leaves it alone, then apply it.
    pub fn override_color(&mut self, color: Color) {
        self.common.flags.insert(PatternFlags::COLOR_OVERRIDDEN);
        self.set_color(color);
    }

    /// Same propagation rule as [`Pattern::set_color`], for byte order.
    pub fn set_endian(&mut self, endian: Endian) {
        match &mut self.kind {
            PatternKind::Pointer(p) => {
                if !p.pointee().has_overridden_endian() {
                    p.pointee_mut().set_endian(endian);
                }
            }
            _ => {
                if let Some(members) = self.owned_members_mut() {
                    members.inherit_endian(endian);
                }
            }
        }

        self.common.endian = endian;
    }

    pub fn override_endian(&mut self, endian: Endian) {
        self.common.flags.insert(PatternFlags::ENDIAN_OVERRIDDEN);
        self.set_endian(endian);
    }

    /// Every address this pattern and its visible descendants claim.
    ///
    /// The map holds one entry per byte, so memory grows with the number of
    /// bytes covered. Callers highlighting very large arrays or unions should
    /// restrict themselves to the visible window, e.g. by walking
    /// [`Pattern::sorted_members`] and calling
    /// [`Pattern::highlighted_addresses_into`] on the members in range.
    pub fn highlighted_addresses(&self) -> HighlightMap {
        let mut highlight = HighlightMap::new();
        self.highlighted_addresses_into(&mut highlight);
        highlight
    }

    /// Add this pattern's addresses to `highlight`. Addresses already present
    /// keep their color.
    pub fn highlighted_addresses_into(&self, highlight: &mut HighlightMap) {
        if self.is_hidden() {
            return;
        }

        match &self.kind {
            PatternKind::Struct(s) => s.members().highlight_into(highlight),
            PatternKind::Union(u) => u.members().highlight_into(highlight),
            PatternKind::Array(a) => a.entries().highlight_into(highlight),
            PatternKind::Pointer(p) => {
                self.common.highlight_own(highlight);
                p.pointee().highlighted_addresses_into(highlight);
            }
            PatternKind::Primitive(_) | PatternKind::Enum(_) | PatternKind::Bitfield(_) => {
                self.common.highlight_own(highlight)
            }
        }
    }

    /// Rebuild the presentation order of every composite in the tree using
    /// `spec`. Declaration order and ownership never change.
    pub fn sort(&mut self, spec: &dyn SortSpec, provider: &dyn ByteProvider) -> Result<()> {
        match &mut self.kind {
            PatternKind::Pointer(p) => p.pointee_mut().sort(spec, provider),
            _ => match self.owned_members_mut() {
                Some(members) => members.sort(spec, provider),
                None => Ok(()),
            },
        }
    }

    /// The innermost visible pattern that claims `offset`.
    pub fn node_at(&self, offset: u64) -> Option<&Pattern> {
        if self.is_hidden() {
            return None;
        }

        match &self.kind {
            PatternKind::Union(u) => u.node_at(self.common.size, offset),
            PatternKind::Struct(s) => s.node_at(offset),
            PatternKind::Array(a) => a.node_at(offset),
            PatternKind::Pointer(p) => {
                if self.common.contains(offset) {
                    Some(self)
                } else {
                    p.pointee().node_at(offset)
                }
            }
            PatternKind::Primitive(_) | PatternKind::Enum(_) | PatternKind::Bitfield(_) => {
                self.common.contains(offset).then_some(self)
            }
        }
    }

    /// Type as shown in a pattern table, e.g. `union Header` or `u8[16]`.
    pub fn formatted_name(&self) -> String {
        let type_name = &self.common.type_name;
        match &self.kind {
            PatternKind::Primitive(_) => type_name.clone(),
            PatternKind::Enum(_) => format!("enum {}", type_name),
            PatternKind::Bitfield(_) => format!("bitfield {}", type_name),
            PatternKind::Pointer(p) => format!("{}*", p.pointee().formatted_name()),
            PatternKind::Struct(_) => format!("struct {}", type_name),
            PatternKind::Union(_) => format!("union {}", type_name),
            PatternKind::Array(a) => format!("{}[{}]", type_name, a.entries().len()),
        }
    }

    /// Render the value for display, reading whatever bytes that takes.
    pub fn format_value(&self, provider: &dyn ByteProvider) -> Result<String> {
        match &self.kind {
            PatternKind::Primitive(kind) => primitive::format_value(*kind, &self.common, provider),
            PatternKind::Enum(e) => e.format_value(&self.common, provider),
            PatternKind::Bitfield(b) => b.format_value(&self.common, provider),
            PatternKind::Pointer(p) => Ok(p.format_value()),
            PatternKind::Struct(_) | PatternKind::Union(_) | PatternKind::Array(_) => {
                Ok("{ ... }".to_owned())
            }
        }
    }

    /// Decoded bitfield values by field name, in declaration order. `None` for
    /// anything but a bitfield.
    pub fn bitfield_values(&self, provider: &dyn ByteProvider) -> Option<Result<Vec<(&str, u128)>>> {
        match &self.kind {
            PatternKind::Bitfield(b) => Some(b.values(&self.common, provider)),
            _ => None,
        }
    }
}

/// Structural equality: same variant, same common properties, and for
/// composites pairwise-equal children in declaration order.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        if !self.common.same_properties(&other.common) {
            return false;
        }

        match (&self.kind, &other.kind) {
            (PatternKind::Primitive(a), PatternKind::Primitive(b)) => a == b,
            (PatternKind::Enum(a), PatternKind::Enum(b)) => a == b,
            (PatternKind::Bitfield(a), PatternKind::Bitfield(b)) => a == b,
            (PatternKind::Pointer(a), PatternKind::Pointer(b)) => a == b,
            (PatternKind::Struct(a), PatternKind::Struct(b)) => a == b,
            (PatternKind::Union(a), PatternKind::Union(b)) => a == b,
            (PatternKind::Array(a), PatternKind::Array(b)) => a == b,
            _ => false,
        }
    }
}
