use fixtures::*;

use pattern_tree::{
    ByteProvider, Color, Endian, Pattern, PatternError, Result, SliceProvider, SortColumn,
    TableSortSpec,
};
use pretty_assertions::assert_eq;
use std::cmp::Ordering;

fn member_names(pattern: &Pattern) -> Vec<&str> {
    pattern.members().iter().map(Pattern::variable_name).collect()
}

fn sorted_names(pattern: &Pattern) -> Vec<&str> {
    pattern
        .sorted_members()
        .into_iter()
        .map(Pattern::variable_name)
        .collect()
}

#[test]
fn test_clone_is_equal_but_independent() {
    ensure_env_logger_initialized();
    let original = value_union(0x20);
    let mut copy = original.clone();

    assert!(!std::ptr::eq(&original, &copy));
    assert_eq!(copy, original);

    let member = copy.member_mut(1).expect("qword member");
    member.set_offset(0x99);
    member.set_variable_name("renamed");
    member.override_color(Color(0xFF12_3456));

    assert_eq!(original.members()[1].offset(), 0x20);
    assert_eq!(original.members()[1].variable_name(), "qword");
    assert_eq!(original.members()[1].color(), Color::NONE);
    assert!(copy != original);
}

#[test]
fn test_rebasing_preserves_relative_offsets() {
    ensure_env_logger_initialized();
    let mut skewed = union_with_relative_offsets(0x10);
    let relative: Vec<u64> = skewed.members().iter().map(|m| m.offset() - 0x10).collect();
    assert_eq!(relative, vec![0, 2, 7]);

    for base in [0x200_u64, 0, 0x7FFF_0000] {
        skewed.set_offset(base);

        assert_eq!(skewed.offset(), base);
        let offsets: Vec<u64> = skewed.members().iter().map(Pattern::offset).collect();
        let expected: Vec<u64> = relative.iter().map(|r| base + r).collect();
        assert_eq!(offsets, expected);
    }
}

#[test]
fn test_rebasing_reaches_nested_members() {
    ensure_env_logger_initialized();
    let mut header = file_header();
    header.set_offset(0x1000);

    let magic = &header.members()[1];
    assert_eq!(magic.offset(), 0x1008);

    let text = &magic.members()[1];
    let offsets: Vec<u64> = text.members().iter().map(Pattern::offset).collect();
    assert_eq!(offsets, vec![0x1008, 0x1009, 0x100A, 0x100B]);
}

#[test]
fn test_lookup_uses_member_matching_union_size() {
    ensure_env_logger_initialized();
    let value = value_union(0x40);

    for offset in 0x40..0x48 {
        let hit = value.node_at(offset).expect("inside the union");
        assert_eq!(hit.variable_name(), "qword");
        assert_eq!(hit.size(), 8);
    }
    assert!(value.node_at(0x48).is_none());
}

#[test]
fn test_lookup_without_matching_member_never_hits() {
    ensure_env_logger_initialized();
    // Declared as 8 bytes, but the widest member only covers 4.
    let malformed = Pattern::union("Value", 0x40, 8).with_members(vec![
        Some(Pattern::unsigned(0x40, 4)),
        Some(Pattern::unsigned(0x40, 2)),
    ]);

    assert!((0x3F..0x49).all(|offset| malformed.node_at(offset).is_none()));
}

#[test]
fn test_lookup_through_struct_and_union() {
    ensure_env_logger_initialized();
    let header = file_header();

    assert_eq!(header.node_at(3).map(Pattern::variable_name), Some("qword"));
    assert_eq!(header.node_at(9).map(Pattern::variable_name), Some("raw"));
    assert_eq!(header.node_at(14).map(Pattern::variable_name), Some("length"));
    assert!(header.node_at(16).is_none());
}

#[test]
fn test_highlights_are_set_union_of_visible_members() {
    ensure_env_logger_initialized();
    let mut value = Pattern::union("Value", 0, 4).with_members(vec![
        Some(Pattern::unsigned(0, 1)),
        Some(Pattern::unsigned(0, 4)),
        Some(Pattern::unsigned(0, 16).with_hidden(true)),
    ]);
    value.set_color(Color(0xFF00_FF00));

    let highlight = value.highlighted_addresses();
    let mut addresses: Vec<u64> = highlight.keys().copied().collect();
    addresses.sort_unstable();

    assert_eq!(addresses, vec![0, 1, 2, 3]);
    assert!(highlight.values().all(|&c| c == Color(0xFF00_FF00)));
}

#[test]
fn test_hidden_union_contributes_no_highlights() {
    ensure_env_logger_initialized();
    let hidden = value_union(0).with_hidden(true);
    assert!(hidden.highlighted_addresses().is_empty());

    let header = Pattern::structure("Header", 0, 12).with_members(vec![
        Some(value_union(0).with_hidden(true)),
        Some(Pattern::unsigned(8, 4)),
    ]);
    let mut addresses: Vec<u64> = header.highlighted_addresses().keys().copied().collect();
    addresses.sort_unstable();
    assert_eq!(addresses, vec![8, 9, 10, 11]);
}

#[test]
fn test_equality_is_structural() {
    ensure_env_logger_initialized();
    let a = value_union(0x10);
    let b = value_union(0x10);
    assert_eq!(a, b);

    let resized = Pattern::union("Value", 0x10, 8)
        .with_name("value")
        .with_members(vec![
            Some(Pattern::unsigned(0x10, 4).with_name("dword")),
            Some(Pattern::unsigned(0x10, 8).with_name("qword")),
            Some(Pattern::unsigned(0x10, 1).with_name("word")),
        ]);
    assert!(a != resized);

    let moved = Pattern::union("Value", 0x10, 8)
        .with_name("value")
        .with_members(vec![
            Some(Pattern::unsigned(0x10, 4).with_name("dword")),
            Some(Pattern::unsigned(0x11, 8).with_name("qword")),
            Some(Pattern::unsigned(0x10, 2).with_name("word")),
        ]);
    assert!(a != moved);

    let retyped = Pattern::union("Value", 0x10, 8)
        .with_name("value")
        .with_members(vec![
            Some(Pattern::signed(0x10, 4).with_name("dword")),
            Some(Pattern::unsigned(0x10, 8).with_name("qword")),
            Some(Pattern::unsigned(0x10, 2).with_name("word")),
        ]);
    assert!(a != retyped);

    let shorter = Pattern::union("Value", 0x10, 8)
        .with_name("value")
        .with_members(vec![
            Some(Pattern::unsigned(0x10, 4).with_name("dword")),
            Some(Pattern::unsigned(0x10, 8).with_name("qword")),
        ]);
    assert!(a != shorter);
}

#[test]
fn test_equality_holds_for_hidden_unions() {
    ensure_env_logger_initialized();
    let a = value_union(0).with_hidden(true);
    let b = a.clone();
    assert_eq!(a, b);
    assert!(a != value_union(0));
}

#[test]
fn test_equality_ignores_presentation_order() {
    ensure_env_logger_initialized();
    let data = sample_bytes();
    let provider = SliceProvider::new(&data);

    let a = value_union(0);
    let mut b = value_union(0);
    b.sort(&TableSortSpec::descending(SortColumn::Size), &provider)
        .unwrap();

    assert_eq!(sorted_names(&b), vec!["qword", "dword", "word"]);
    assert_eq!(a, b);
}

#[test]
fn test_sorting_never_changes_ownership_order() {
    ensure_env_logger_initialized();
    let data = sample_bytes();
    let provider = SliceProvider::new(&data);
    let mut value = value_union(0);
    let declared = vec!["dword", "qword", "word"];

    let specs = [
        TableSortSpec::ascending(SortColumn::Name),
        TableSortSpec::descending(SortColumn::Size),
        TableSortSpec::ascending(SortColumn::Value),
        TableSortSpec::descending(SortColumn::Name),
        TableSortSpec::ascending(SortColumn::Offset),
        TableSortSpec::ascending(SortColumn::Color),
    ];

    for spec in specs.iter().cycle().take(24) {
        value.sort(spec, &provider).unwrap();

        assert_eq!(member_names(&value), declared);

        let mut presented = sorted_names(&value);
        assert_eq!(presented.len(), declared.len());
        presented.sort_unstable();
        let mut expected = declared.clone();
        expected.sort_unstable();
        assert_eq!(presented, expected);
    }
}

#[test]
fn test_sort_is_stable_and_restarts_from_declaration_order() {
    ensure_env_logger_initialized();
    let data = sample_bytes();
    let provider = SliceProvider::new(&data);
    let mut value = value_union(0);

    value.sort(&TableSortSpec::ascending(SortColumn::Name), &provider)
        .unwrap();
    assert_eq!(sorted_names(&value), vec!["dword", "qword", "word"]);

    // Every member shares the same offset, so a stable sort by offset must
    // restore declaration order rather than keep the previous sort.
    value.sort(&TableSortSpec::descending(SortColumn::Offset), &provider)
        .unwrap();
    assert_eq!(sorted_names(&value), vec!["dword", "qword", "word"]);
}

#[test]
fn test_sort_recurses_into_nested_composites() {
    ensure_env_logger_initialized();
    let data = sample_bytes();
    let provider = SliceProvider::new(&data);
    let mut header = file_header();

    header.sort(&TableSortSpec::descending(SortColumn::Name), &provider)
        .unwrap();

    assert_eq!(sorted_names(&header), vec!["value", "magic", "length"]);
    assert_eq!(sorted_names(&header.members()[0]), vec!["word", "qword", "dword"]);
    assert_eq!(sorted_names(&header.members()[1]), vec!["text", "raw"]);
    assert_eq!(
        sorted_names(&header.members()[1].members()[1]),
        vec!["[3]", "[2]", "[1]", "[0]"]
    );
}

#[test]
fn test_sort_with_custom_comparator() {
    ensure_env_logger_initialized();
    let data = sample_bytes();
    let provider = SliceProvider::new(&data);
    let mut value = value_union(0);

    let by_name_length = |l: &Pattern, r: &Pattern, _: &dyn ByteProvider| -> Result<Ordering> {
        Ok(l.variable_name().len().cmp(&r.variable_name().len()))
    };
    value.sort(&by_name_length, &provider).unwrap();

    assert_eq!(sorted_names(&value), vec!["word", "dword", "qword"]);
}

#[test]
fn test_sort_propagates_provider_failures() {
    ensure_env_logger_initialized();
    let data = [0_u8; 2];
    let provider = SliceProvider::new(&data);
    let mut value = value_union(0);

    let result = value.sort(&TableSortSpec::ascending(SortColumn::Value), &provider);
    assert!(matches!(result, Err(PatternError::OutOfBounds { .. })));

    assert_eq!(member_names(&value), vec!["dword", "qword", "word"]);
    assert_eq!(value.sorted_members().len(), 3);
}

#[test]
fn test_sort_failing_midway_on_wide_union_returns_error() {
    ensure_env_logger_initialized();
    let data: Vec<u8> = (0..40_u8).rev().collect();
    let provider = SliceProvider::new(&data);

    // Member 25 points past the end of the data, so the value column fails
    // once the merge reaches it.
    let mut wide = Pattern::union("Wide", 0, 1).with_members((0..40_u64).map(|i| {
        let offset = if i == 25 { 0x100 } else { i };
        Some(Pattern::unsigned(offset, 1).with_name(format!("m{}", i)))
    }));

    let result = wide.sort(&TableSortSpec::ascending(SortColumn::Value), &provider);
    assert!(matches!(
        result,
        Err(PatternError::OutOfBounds { offset: 0x100, .. })
    ));

    let declared: Vec<String> = (0..40).map(|i| format!("m{}", i)).collect();
    assert_eq!(member_names(&wide), declared);
    assert_eq!(sorted_names(&wide), declared);
}

#[test]
fn test_color_and_endian_cascade_to_unpinned_members() {
    ensure_env_logger_initialized();
    let mut header = file_header();
    header.set_color(Color(0xFF11_1111));
    header.set_endian(Endian::Little);

    let value = &header.members()[0];
    assert!(value.members().iter().all(|m| m.color() == Color(0xFF11_1111)));
    assert!(value.members().iter().all(|m| m.endian() == Endian::Little));

    let length = &header.members()[2];
    assert_eq!(length.color(), Color(0xFF00_00FF));
    assert_eq!(length.endian(), Endian::Big);
}

#[test]
fn test_pinned_member_keeps_its_values_through_union() {
    ensure_env_logger_initialized();
    let mut value = Pattern::union("Value", 0, 4).with_members(vec![
        Some(Pattern::unsigned(0, 4).with_name("pinned").with_endian(Endian::Big)),
        Some(Pattern::unsigned(0, 2).with_name("free")),
    ]);

    value.override_endian(Endian::Little);
    assert!(value.has_overridden_endian());
    assert_eq!(value.members()[0].endian(), Endian::Big);
    assert_eq!(value.members()[1].endian(), Endian::Little);
}

#[test]
fn test_zero_sized_union_does_not_underflow() {
    ensure_env_logger_initialized();
    let empty = Pattern::union("Empty", 0, 0);
    assert_eq!(empty.end_address(), 0);
    assert!(empty.highlighted_addresses().is_empty());
    assert!(empty.node_at(0).is_none());

    let with_empty_member = Pattern::union("Empty", 0x30, 0)
        .with_members(vec![Some(Pattern::structure("Nothing", 0x30, 0))]);
    assert_eq!(with_empty_member.end_address(), 0x30);
    assert!(with_empty_member.node_at(0x30).is_none());

    let zero_leaf = Pattern::union("Tiny", 0x30, 0)
        .with_members(vec![Some(Pattern::unsigned(0x30, 0).with_color(Color(5)))]);
    let highlight = zero_leaf.highlighted_addresses();
    assert_eq!(highlight.len(), 1);
    assert_eq!(highlight[&0x30], Color(5));
}
