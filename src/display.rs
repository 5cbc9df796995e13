//! Table rows for presenting a pattern tree.
//!
//! This is everything a pattern table needs to draw, with no UI toolkit
//! involved: one [`DisplayRow`] per visible pattern, in presentation order.
//! Hidden patterns and their descendants produce no rows. Inlined composites
//! produce no row of their own and lift their children to their own depth.

use crate::err::Result;
use crate::pattern::{Color, Pattern};
use crate::provider::ByteProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub depth: usize,
    pub name: String,
    pub range: String,
    pub size: String,
    pub type_label: String,
    pub value: String,
    pub color: Color,
}

impl DisplayRow {
    pub fn for_pattern(pattern: &Pattern, depth: usize, provider: &dyn ByteProvider) -> Result<Self> {
        Ok(DisplayRow {
            depth,
            name: pattern.display_name().to_owned(),
            range: range_label(pattern),
            size: size_label(pattern),
            type_label: pattern.formatted_name(),
            value: pattern.format_value(provider)?,
            color: pattern.color(),
        })
    }
}

/// `0x{start:08X} : 0x{end:08X}`, with the end address inclusive.
pub fn range_label(pattern: &Pattern) -> String {
    format!("0x{:08X} : 0x{:08X}", pattern.offset(), pattern.end_address())
}

pub fn size_label(pattern: &Pattern) -> String {
    format!("0x{:04X}", pattern.size())
}

/// Flatten `root` into table rows. Provider failures abort the walk.
pub fn display_rows(root: &Pattern, provider: &dyn ByteProvider) -> Result<Vec<DisplayRow>> {
    let mut rows = Vec::new();
    collect_rows(root, 0, provider, &mut rows)?;
    Ok(rows)
}

fn collect_rows(
    pattern: &Pattern,
    depth: usize,
    provider: &dyn ByteProvider,
    rows: &mut Vec<DisplayRow>,
) -> Result<()> {
    if pattern.is_hidden() {
        return Ok(());
    }

    let inlined = pattern.is_inlined() && pattern.is_composite();
    let child_depth = if inlined {
        depth
    } else {
        rows.push(DisplayRow::for_pattern(pattern, depth, provider)?);
        depth + 1
    };

    for child in pattern.sorted_members() {
        collect_rows(child, child_depth, provider, rows)?;
    }

    Ok(())
}
