//! Presentation ordering.
//!
//! A composite pattern never decides how its children are ordered for display.
//! The caller hands in a [`SortSpec`], and the composite applies it to its
//! presentation order only.

use crate::err::Result;
use crate::pattern::{Endian, Pattern};
use crate::provider::{ByteProvider, read_exact};

use std::cmp::Ordering;

/// Comparator over two sibling patterns.
pub trait SortSpec {
    fn compare(&self, left: &Pattern, right: &Pattern, provider: &dyn ByteProvider) -> Result<Ordering>;
}

impl<F> SortSpec for F
where
    F: Fn(&Pattern, &Pattern, &dyn ByteProvider) -> Result<Ordering>,
{
    fn compare(&self, left: &Pattern, right: &Pattern, provider: &dyn ByteProvider) -> Result<Ordering> {
        self(left, right, provider)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Offset,
    Size,
    Value,
    Type,
    Color,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort by a single pattern table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl TableSortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        TableSortSpec { column, direction }
    }

    pub fn ascending(column: SortColumn) -> Self {
        TableSortSpec::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: SortColumn) -> Self {
        TableSortSpec::new(column, SortDirection::Descending)
    }
}

impl SortSpec for TableSortSpec {
    fn compare(&self, left: &Pattern, right: &Pattern, provider: &dyn ByteProvider) -> Result<Ordering> {
        let ordering = match self.column {
            SortColumn::Name => left.display_name().cmp(right.display_name()),
            SortColumn::Offset => left.offset().cmp(&right.offset()),
            SortColumn::Size => left.size().cmp(&right.size()),
            SortColumn::Value => compare_values(left, right, provider)?,
            SortColumn::Type => left.type_name().cmp(right.type_name()),
            SortColumn::Color => left.color().cmp(&right.color()),
        };

        Ok(match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        })
    }
}

/// Compare the raw bytes behind two patterns as unsigned magnitudes, honoring
/// each pattern's byte order.
fn compare_values(left: &Pattern, right: &Pattern, provider: &dyn ByteProvider) -> Result<Ordering> {
    let width = left.size().max(right.size());
    let left = magnitude(left, width, provider)?;
    let right = magnitude(right, width, provider)?;

    Ok(left.cmp(&right))
}

/// Big-endian bytes of `pattern`, left-padded with zeroes to `width`.
fn magnitude(pattern: &Pattern, width: u64, provider: &dyn ByteProvider) -> Result<Vec<u8>> {
    let mut bytes = read_exact(provider, pattern.offset(), pattern.size())?;
    if pattern.endian() == Endian::Little {
        bytes.reverse();
    }

    let padding = usize::try_from(width - pattern.size()).unwrap_or(0);
    let mut padded = vec![0_u8; padding];
    padded.extend_from_slice(&bytes);
    Ok(padded)
}
