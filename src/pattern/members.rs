//! Owned child list shared by the composite variants.
//!
//! Children are owned in declaration order. The presentation order is a
//! separate list of indices into that owned list; sorting only ever touches the
//! indices, so ownership and declaration order are stable across any number of
//! sort passes.

use crate::err::Result;
use crate::pattern::{Color, Endian, HighlightMap, Pattern};
use crate::provider::ByteProvider;
use crate::sort::SortSpec;

use log::{debug, trace};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct Members {
    owned: Vec<Pattern>,
    order: Vec<usize>,
}

impl Members {
    pub fn new() -> Self {
        Members::default()
    }

    /// Drop every current child and take ownership of `members`, skipping
    /// absent entries. Returns the number of children kept.
    pub(crate) fn replace<I>(&mut self, members: I) -> usize
    where
        I: IntoIterator<Item = Option<Pattern>>,
    {
        self.owned.clear();
        self.order.clear();

        let mut dropped = 0_usize;
        for (position, member) in members.into_iter().enumerate() {
            match member {
                Some(member) => {
                    self.order.push(self.owned.len());
                    self.owned.push(member);
                }
                None => {
                    trace!("Skipping absent member at position {}", position);
                    dropped += 1;
                }
            }
        }

        debug!(
            "Replaced members: {} kept, {} absent dropped",
            self.owned.len(),
            dropped
        );
        self.owned.len()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Children in declaration order.
    pub fn as_slice(&self) -> &[Pattern] {
        &self.owned
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.owned.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Pattern> {
        self.owned.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pattern> {
        self.owned.get_mut(index)
    }

    /// Children in presentation order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.order.iter().map(move |&index| &self.owned[index])
    }

    /// Indices into [`Members::as_slice`], in presentation order.
    pub fn presentation_order(&self) -> &[usize] {
        &self.order
    }

    /// Move every child by the distance between `old_base` and `new_base`,
    /// keeping each child's position relative to the base.
    pub(crate) fn rebase(&mut self, old_base: u64, new_base: u64) {
        for member in &mut self.owned {
            let relative = member.offset().wrapping_sub(old_base);
            member.set_offset(new_base.wrapping_add(relative));
        }
    }

    pub(crate) fn inherit_color(&mut self, color: Color) {
        for member in self.owned.iter_mut().filter(|m| !m.has_overridden_color()) {
            member.set_color(color);
        }
    }

    pub(crate) fn inherit_endian(&mut self, endian: Endian) {
        for member in self.owned.iter_mut().filter(|m| !m.has_overridden_endian()) {
            member.set_endian(endian);
        }
    }

    pub(crate) fn highlight_into(&self, highlight: &mut HighlightMap) {
        for member in &self.owned {
            member.highlighted_addresses_into(highlight);
        }
    }

    /// Reset the presentation order to declaration order, stable-sort it with
    /// `spec`, then sort every child's own children.
    ///
    /// The first comparator error stops the pass; the presentation order is
    /// then back in declaration order.
    pub(crate) fn sort(&mut self, spec: &dyn SortSpec, provider: &dyn ByteProvider) -> Result<()> {
        let Members { owned, order } = self;

        order.clear();
        order.extend(0..owned.len());

        debug!("Sorting {} members", owned.len());

        let sorted = merge_sort_by(order, |left, right| {
            spec.compare(&owned[left], &owned[right], provider)
        });
        if let Err(e) = sorted {
            debug!("Sort aborted, restoring declaration order: {}", e);
            order.clear();
            order.extend(0..owned.len());
            return Err(e);
        }

        for member in owned.iter_mut() {
            member.sort(spec, provider)?;
        }

        Ok(())
    }
}

/// Bottom-up stable merge sort that stops at the first comparator error.
fn merge_sort_by<F>(items: &mut Vec<usize>, mut compare: F) -> Result<()>
where
    F: FnMut(usize, usize) -> Result<Ordering>,
{
    let len = items.len();
    let mut scratch = items.clone();
    let mut width = 1;

    while width < len {
        let mut start = 0;
        while start < len {
            let mid = start.saturating_add(width).min(len);
            let end = start.saturating_add(width.saturating_mul(2)).min(len);
            let (mut left, mut right) = (start, mid);

            for slot in &mut scratch[start..end] {
                // Ties go to the left run.
                let take_left = if left < mid && right < end {
                    compare(items[left], items[right])? != Ordering::Greater
                } else {
                    left < mid
                };

                if take_left {
                    *slot = items[left];
                    left += 1;
                } else {
                    *slot = items[right];
                    right += 1;
                }
            }

            start = end;
        }

        std::mem::swap(items, &mut scratch);
        width = width.saturating_mul(2);
    }

    Ok(())
}

/// Pairwise structural equality in declaration order. The presentation order
/// is not compared.
impl PartialEq for Members {
    fn eq(&self, other: &Self) -> bool {
        self.owned.len() == other.owned.len()
            && self.owned.iter().zip(&other.owned).all(|(a, b)| a == b)
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.owned.iter()
    }
}
