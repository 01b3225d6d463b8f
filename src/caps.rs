//! `ValueCaps`, the flat per-field capability record (`spec.md` §3.1), and
//! the two flag words attached to it.

use bitfield::bitfield;
use bytemuck::{Pod, Zeroable};

bitfield! {
    /// Raw flags carried by a Main item (Input/Output/Feature), decoded
    /// lazily from [`ValueCaps::bit_field`]. Bit numbering matches USB HID
    /// spec 6.2.2.5.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct MainItemFlags(u32);
    impl Debug;
    pub is_constant, _: 0;
    pub is_variable, _: 1;
    pub is_relative, _: 2;
    pub is_wrap, _: 3;
    pub is_nonlinear, _: 4;
    pub is_no_preferred, _: 5;
    pub has_null_state, _: 6;
    pub is_volatile, _: 7;
    pub is_buffered_bytes, _: 8;
}

/// Parser-derived booleans (`spec.md` §3.1 `flags`), packed into one `u16`
/// so [`ValueCaps`] stays `bytemuck::Pod`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(transparent)]
pub struct CapsFlags(pub u16);

impl CapsFlags {
    pub const IS_RANGE: Self = Self(1 << 0);
    pub const IS_DESIGNATOR_RANGE: Self = Self(1 << 1);
    pub const IS_STRING_RANGE: Self = Self(1 << 2);
    pub const IS_ABSOLUTE: Self = Self(1 << 3);
    pub const IS_CONSTANT: Self = Self(1 << 4);
    pub const IS_BUTTON: Self = Self(1 << 5);
    pub const ARRAY_HAS_MORE: Self = Self(1 << 6);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl core::ops::BitOr for CapsFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One field (or grouped array of fields) in some report (`spec.md` §3.1).
///
/// Collection nodes (`spec.md` §4.4) are stored using this same record type
/// so the four capability arrays can share one element size in the
/// preparsed blob; for a collection entry, `report_id` instead holds the
/// collection type byte (Physical/Application/Logical/…) and `usage_min`/
/// `usage_max` both hold the collection's own usage, see [`crate::layout`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct ValueCaps {
    pub logical_min: i32,
    pub logical_max: i32,
    pub physical_min: i32,
    pub physical_max: i32,
    pub units: u32,
    pub bit_field: u32,

    pub usage_page: u16,
    pub usage_min: u16,
    pub usage_max: u16,
    pub start_byte: u16,
    pub report_count: u16,
    pub data_index_min: u16,
    pub data_index_max: u16,
    pub designator_min: u16,
    pub designator_max: u16,
    pub string_min: u16,
    pub string_max: u16,
    pub link_collection: u16,
    pub link_usage_page: u16,
    pub link_usage: u16,

    pub report_id: u8,
    pub start_bit: u8,
    pub bit_size: u8,
    pub units_exp: i8,

    pub flags: CapsFlags,
    _reserved: u16,
}

impl ValueCaps {
    pub fn main_flags(&self) -> MainItemFlags {
        MainItemFlags(self.bit_field)
    }

    /// Only meaningful on a record taken from the collections array.
    pub fn collection_type(&self) -> u8 {
        self.report_id
    }
}

impl Default for ValueCaps {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}
