//! End-to-end scenario tests mirroring real report descriptors, each
//! spelled out byte-by-byte with an item-level comment trail.

use hidparse::{CapsFlags, DefaultAlloc, HidParseError};

/// S1: minimal mouse, buttons (variable) + X/Y (relative), no report ID.
const MINIMAL_MOUSE: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (1)
    0x29, 0x03, //     Usage Maximum (3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Var, Abs)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x03, //     Input (Const, Var, Abs) -- padding
    0xC0, //   End Collection
    0xC0, // End Collection
];

#[test]
fn s1_minimal_mouse() {
    let mut alloc = DefaultAlloc;
    let desc = hidparse::get_collection_description(MINIMAL_MOUSE, &mut alloc).unwrap();

    assert_eq!(desc.collection.usage_page, 1);
    assert_eq!(desc.collection.usage, 2);
    assert_eq!(desc.collection.input_length, 1);
    assert_eq!(desc.collection.output_length, 0);
    assert_eq!(desc.collection.feature_length, 0);
    assert_eq!(desc.preparsed.header().number_link_collection_nodes, 2);
}

/// S2: boot-keyboard shaped descriptor — 8-bit modifier byte, 1 reserved
/// byte, 6-byte key array.
const BOOT_KEYBOARD: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (224)
    0x29, 0xE7, //   Usage Maximum (231)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Var, Abs) -- modifier byte
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Const) -- reserved byte
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x65, //   Logical Maximum (101)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0x65, //   Usage Maximum (101)
    0x81, 0x00, //   Input (Data, Ary, Abs) -- 6-key array
    0xC0, // End Collection
];

#[test]
fn s2_boot_keyboard_byte_length_and_array_shape() {
    let mut alloc = DefaultAlloc;
    let desc = hidparse::get_collection_description(BOOT_KEYBOARD, &mut alloc).unwrap();

    assert_eq!(desc.collection.input_length, 8);

    let fields = desc.preparsed.input_caps();
    // modifier (1 range record) + reserved byte (1 const record) + the
    // 6-key array expanded into 102 usage slots (0..=101).
    let modifier = &fields[0];
    assert_eq!(modifier.bit_size, 1);
    assert_eq!(modifier.report_count, 8);
    assert!(modifier.flags.contains(CapsFlags::IS_RANGE));

    let reserved = &fields[1];
    assert_eq!(reserved.bit_size, 8);
    assert!(reserved.flags.contains(CapsFlags::IS_CONSTANT));

    // The 6-key array was declared via Usage Minimum/Maximum (range mode),
    // so it collapses to one record spanning the whole usage range rather
    // than one record per usage slot (`spec.md` §4.5 step 6: `U = max(1,
    // usages_size)`, and range mode always stores exactly one entry).
    assert_eq!(fields.len(), 3);
    let array = &fields[2];
    assert_eq!(array.bit_size, 8);
    assert_eq!(array.report_count, 6);
    assert_eq!(array.usage_min, 0);
    assert_eq!(array.usage_max, 101);
    assert!(array.flags.contains(CapsFlags::IS_RANGE));
    assert!(!array.flags.contains(CapsFlags::ARRAY_HAS_MORE));
}

/// S4: Push/Pop restores the prior global snapshot.
const PUSH_POP: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x00, // Usage (Undefined)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x80, //   Logical Minimum (-128)
    0xA4, //   Push
    0x15, 0x00, //   Logical Minimum (0)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Var, Abs) -- logical_min should read 0
    0xB4, //   Pop
    0x81, 0x02, //   Input (Data, Var, Abs) -- logical_min should read -128
    0xC0, // End Collection
];

#[test]
fn s4_push_pop_restores_prior_globals() {
    let mut alloc = DefaultAlloc;
    let desc = hidparse::get_collection_description(PUSH_POP, &mut alloc).unwrap();
    let fields = desc.preparsed.input_caps();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].logical_min, 0);
    assert_eq!(fields[1].logical_min, -128);
    assert!(desc.warnings.is_empty());
}

/// S5: a truncated item is a fatal, not a best-effort, error.
#[test]
fn s5_truncated_item_is_rejected() {
    let mut alloc = DefaultAlloc;
    let err = hidparse::get_collection_description(&[0x75], &mut alloc).unwrap_err();
    assert_eq!(err, HidParseError::DescriptorTruncated);
}

/// S6: a long-item prefix is recognized but rejected, not decoded.
#[test]
fn s6_long_item_prefix_is_rejected() {
    let mut alloc = DefaultAlloc;
    let err = hidparse::get_collection_description(&[0xFE, 0x00, 0x00], &mut alloc).unwrap_err();
    assert_eq!(err, HidParseError::ReservedItemType);
}

#[test]
fn s6_reserved_item_type_bits_are_rejected() {
    // type bits 11 (Reserved) with size 0 and tag 0 -> prefix 0b0000_1100.
    let mut alloc = DefaultAlloc;
    let err = hidparse::get_collection_description(&[0b0000_1100], &mut alloc).unwrap_err();
    assert_eq!(err, HidParseError::ReservedItemType);
}
