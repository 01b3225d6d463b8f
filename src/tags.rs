//! Short-item tag constants (USB HID spec 6.2.2.4/6.2.2.7/6.2.2.8).
//!
//! Each constant already has the tag nibble shifted into bits 4-7, so a
//! decoded [`crate::item::RawItem::tag`] can be compared against these
//! directly without re-shifting.

pub(crate) mod main_tag {
    pub const INPUT: u8 = 0x80;
    pub const OUTPUT: u8 = 0x90;
    pub const COLLECTION: u8 = 0xA0;
    pub const FEATURE: u8 = 0xB0;
    pub const END_COLLECTION: u8 = 0xC0;
}

pub(crate) mod global_tag {
    pub const USAGE_PAGE: u8 = 0x04;
    pub const LOGICAL_MINIMUM: u8 = 0x14;
    pub const LOGICAL_MAXIMUM: u8 = 0x24;
    pub const PHYSICAL_MINIMUM: u8 = 0x34;
    pub const PHYSICAL_MAXIMUM: u8 = 0x44;
    pub const UNIT_EXPONENT: u8 = 0x54;
    pub const UNIT: u8 = 0x64;
    pub const REPORT_SIZE: u8 = 0x74;
    pub const REPORT_ID: u8 = 0x84;
    pub const REPORT_COUNT: u8 = 0x94;
    pub const PUSH: u8 = 0xA4;
    pub const POP: u8 = 0xB4;
}

pub(crate) mod local_tag {
    pub const USAGE: u8 = 0x08;
    pub const USAGE_MINIMUM: u8 = 0x18;
    pub const USAGE_MAXIMUM: u8 = 0x28;
    pub const DESIGNATOR_INDEX: u8 = 0x38;
    pub const DESIGNATOR_MINIMUM: u8 = 0x48;
    pub const DESIGNATOR_MAXIMUM: u8 = 0x58;
    pub const STRING_INDEX: u8 = 0x78;
    pub const STRING_MINIMUM: u8 = 0x88;
    pub const STRING_MAXIMUM: u8 = 0x98;
    pub const DELIMITER: u8 = 0xA8;
}
