//! Decodes one short item at a time from a report descriptor byte slice.
//!
//! Long items (`0xFE` prefix, USB HID spec 6.2.2.3) are recognized but not
//! decoded — see [`crate::error::HidParseError::ReservedItemType`].

use crate::error::HidParseError;

const LONG_ITEM_PREFIX: u8 = 0b1111_1110;

/// Which of the three item categories a decoded item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ItemType {
    Main,
    Global,
    Local,
}

/// A single decoded short item: its tag, category, and both interpretations
/// of its data bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawItem {
    /// Tag nibble, pre-shifted into bits 4-7 so it can be matched directly
    /// against the constants in [`crate::tags`].
    pub tag: u8,
    pub item_type: ItemType,
    pub size: u8,
    /// Little-endian unsigned reinterpretation of the data bytes (0 if the
    /// item carries no data).
    pub raw: u32,
    /// Sign-extended reinterpretation of the same bytes.
    pub signed: i32,
}

pub(crate) struct ItemReader<'a> {
    data: &'a [u8],
}

impl<'a> ItemReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn decode_one(&mut self) -> Result<RawItem, HidParseError> {
        let prefix = self.data[0];
        if prefix == LONG_ITEM_PREFIX {
            return Err(HidParseError::ReservedItemType);
        }

        let size = match prefix & 0b11 {
            0 => 0u8,
            1 => 1,
            2 => 2,
            _ => 4, // size code 3 means 4 data bytes
        };
        let item_type = match (prefix >> 2) & 0b11 {
            0 => ItemType::Main,
            1 => ItemType::Global,
            2 => ItemType::Local,
            _ => return Err(HidParseError::ReservedItemType),
        };
        // Tag constants in `crate::tags` bake in both the tag nibble and the
        // 2-bit type field (e.g. `global_tag::REPORT_SIZE == 0x74`), so only
        // the low 2 (size) bits are masked off here.
        let tag = prefix & 0b1111_1100;

        let total = 1 + size as usize;
        if self.data.len() < total {
            return Err(HidParseError::DescriptorTruncated);
        }
        let payload = &self.data[1..total];

        let mut widened = [0u8; 4];
        widened[..payload.len()].copy_from_slice(payload);
        let raw = u32::from_le_bytes(widened);
        let signed = match size {
            0 => 0,
            1 => payload[0] as i8 as i32,
            2 => i16::from_le_bytes([payload[0], payload[1]]) as i32,
            _ => i32::from_le_bytes(widened),
        };

        self.data = &self.data[total..];
        Ok(RawItem { tag, item_type, size, raw, signed })
    }
}

impl<'a> Iterator for ItemReader<'a> {
    type Item = Result<RawItem, HidParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.decode_one())
    }
}
