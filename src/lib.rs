//! In-memory model of a decoded binary layout.
//!
//! Evaluating a binary template against a byte source yields a tree of
//! [`Pattern`]s. Each pattern describes a typed region of the source (offset,
//! size, color, byte order) and composite patterns own their children. The
//! union variant models several interpretations of the same bytes: all members
//! start at the union's offset and the union is as large as its widest member.
//!
//! Nothing here reads the source directly. Operations that need bytes take a
//! [`ByteProvider`] and return its errors unchanged.
//!
//! ```
//! use pattern_tree::{Pattern, SliceProvider};
//!
//! let data = [0x2A, 0x00, 0x00, 0x00];
//! let provider = SliceProvider::new(&data);
//!
//! let value = Pattern::union("Value", 0, 4).with_members(vec![
//!     Some(Pattern::unsigned(0, 1).with_name("byte")),
//!     Some(Pattern::unsigned(0, 4).with_name("dword")),
//! ]);
//!
//! let hit = value.node_at(2).expect("inside the union");
//! assert_eq!(hit.variable_name(), "dword");
//! assert_eq!(value.formatted_name(), "union Value");
//! assert!(hit.format_value(&provider).is_ok());
//! ```

pub mod display;
pub mod err;
pub mod pattern;
pub mod provider;
pub mod sort;

pub use crate::display::{DisplayRow, display_rows};
pub use crate::err::{PatternError, Result};
pub use crate::pattern::{
    ArrayPattern, BitfieldField, BitfieldPattern, Color, Endian, EnumEntry, EnumPattern,
    HighlightMap, Members, Pattern, PatternFlags, PatternKind, PointerPattern, PrimitiveKind,
    StructPattern, UnionPattern,
};
pub use crate::provider::{ByteProvider, SliceProvider};
pub use crate::sort::{SortColumn, SortDirection, SortSpec, TableSortSpec};
