//! Parses binary USB-HID report descriptors (short items only) into a
//! preparsed representation a caller can use to interpret live report
//! buffers. Device I/O, usage-table validation, and report interpretation
//! itself are out of scope — this crate only turns descriptor bytes into
//! structured capability data.

mod alloc;
mod caps;
mod describe;
mod error;
mod item;
mod layout;
mod preparsed;
mod state;
mod tags;

pub use alloc::{DefaultAlloc, PreparsedAlloc};
pub use caps::{CapsFlags, MainItemFlags, ValueCaps};
pub use describe::{CollectionDesc, DeviceDescription, ReportIdDesc};
pub use error::{HidParseError, ParseWarning};
pub use preparsed::{PreparsedData, PreparsedHeader};

use item::{ItemReader, ItemType, RawItem};
use layout::Direction;
use state::ParserState;

/// Drives an [`ItemReader`] over `bytes`, mutating a fresh [`ParserState`]
/// item by item, then hands the finished state to [`preparsed::build`]
/// (`spec.md` §2, §4.6). Crate-internal: callers only ever see
/// [`get_collection_description`].
fn parse_descriptor(
    bytes: &[u8],
    alloc: &mut impl PreparsedAlloc,
) -> Result<(PreparsedData, Vec<ParseWarning>), HidParseError> {
    let mut state = ParserState::new();
    let mut warnings = Vec::new();

    for item in ItemReader::new(bytes) {
        let item = item?;
        match item.item_type {
            ItemType::Main => handle_main(&mut state, &item, &mut warnings)?,
            ItemType::Global => handle_global(&mut state, &item, &mut warnings)?,
            ItemType::Local => handle_local(&mut state, &item)?,
        }
    }

    if !state.global_stack.is_empty() {
        tracing::warn!("{}", ParseWarning::UnfinishedGlobalNesting);
        warnings.push(ParseWarning::UnfinishedGlobalNesting);
    }
    if !state.collection_stack.is_empty() {
        tracing::warn!("{}", ParseWarning::UnfinishedCollectionNesting);
        warnings.push(ParseWarning::UnfinishedCollectionNesting);
    }

    let top_level_usage_page = state.top_level_usage_page;
    let top_level_usage = state.top_level_usage;
    let preparsed = preparsed::build(&state, top_level_usage_page, top_level_usage, alloc)?;
    Ok((preparsed, warnings))
}

/// The crate's single public entry point (`spec.md` §6.1): parses `bytes`
/// and returns a [`DeviceDescription`] summarizing the top-level collection
/// and every distinct report ID in use. There is no separate free
/// function — dropping the returned value releases everything, including
/// the preparsed blob, together.
pub fn get_collection_description(
    bytes: &[u8],
    alloc: &mut impl PreparsedAlloc,
) -> Result<DeviceDescription, HidParseError> {
    let (preparsed, warnings) = parse_descriptor(bytes, alloc)?;
    Ok(describe::describe(preparsed, warnings))
}

fn handle_main(
    state: &mut ParserState,
    item: &RawItem,
    warnings: &mut Vec<ParseWarning>,
) -> Result<(), HidParseError> {
    match item.tag {
        tags::main_tag::INPUT => layout::emit_main_item(state, Direction::Input, item.raw),
        tags::main_tag::OUTPUT => layout::emit_main_item(state, Direction::Output, item.raw),
        tags::main_tag::FEATURE => layout::emit_main_item(state, Direction::Feature, item.raw),
        tags::main_tag::COLLECTION => layout::handle_collection(state, item.raw as u8),
        tags::main_tag::END_COLLECTION => {
            layout::handle_end_collection(state, warnings);
            Ok(())
        }
        tag => Err(HidParseError::UnknownTag { tag, item_type: "main" }),
    }
}

fn handle_global(
    state: &mut ParserState,
    item: &RawItem,
    warnings: &mut Vec<ParseWarning>,
) -> Result<(), HidParseError> {
    match item.tag {
        tags::global_tag::USAGE_PAGE => state.globals.usage_page = item.raw as u16,
        tags::global_tag::LOGICAL_MINIMUM => state.globals.logical_min = item.signed,
        tags::global_tag::LOGICAL_MAXIMUM => state.globals.logical_max = item.signed,
        tags::global_tag::PHYSICAL_MINIMUM => state.globals.physical_min = item.signed,
        tags::global_tag::PHYSICAL_MAXIMUM => state.globals.physical_max = item.signed,
        tags::global_tag::UNIT_EXPONENT => state.globals.units_exp = item.signed,
        tags::global_tag::UNIT => state.globals.units = item.raw,
        tags::global_tag::REPORT_SIZE => state.globals.bit_size = item.raw,
        tags::global_tag::REPORT_ID => state.globals.report_id = item.raw as u8,
        tags::global_tag::REPORT_COUNT => state.globals.report_count = item.raw,
        tags::global_tag::PUSH => state.push_globals()?,
        tags::global_tag::POP => state.pop_globals(warnings),
        tag => return Err(HidParseError::UnknownTag { tag, item_type: "global" }),
    }
    Ok(())
}

fn handle_local(state: &mut ParserState, item: &RawItem) -> Result<(), HidParseError> {
    let page = (item.raw >> 16) as u16;
    let value = (item.raw & 0xFFFF) as u16;

    match item.tag {
        tags::local_tag::USAGE => {
            if state.locals.usage_is_range {
                state.locals.usages_size = 0;
                state.locals.usage_is_range = false;
            }
            if state.locals.usages_size >= 256 {
                return Err(HidParseError::UsageOverflow);
            }
            let slot = state.locals.usages_size;
            state.locals.usages_page[slot] = page;
            state.locals.usages_min[slot] = value;
            state.locals.usages_max[slot] = value;
            state.locals.usages_size += 1;
        }
        tags::local_tag::USAGE_MINIMUM => {
            state.locals.usages_page[0] = page;
            state.locals.usages_min[0] = value;
            state.locals.usages_size = state.locals.usages_size.max(1);
            state.locals.usage_is_range = true;
        }
        tags::local_tag::USAGE_MAXIMUM => {
            if page != 0 {
                state.locals.usages_page[0] = page;
            }
            state.locals.usages_max[0] = value;
            state.locals.usages_size = state.locals.usages_size.max(1);
            state.locals.usage_is_range = true;
        }
        tags::local_tag::DESIGNATOR_INDEX => {
            state.locals.designator_min = item.raw;
            state.locals.designator_max = item.raw;
            state.locals.designator_is_range = false;
        }
        tags::local_tag::DESIGNATOR_MINIMUM => {
            state.locals.designator_min = item.raw;
            state.locals.designator_is_range = true;
        }
        tags::local_tag::DESIGNATOR_MAXIMUM => {
            state.locals.designator_max = item.raw;
            state.locals.designator_is_range = true;
        }
        tags::local_tag::STRING_INDEX => {
            state.locals.string_min = item.raw;
            state.locals.string_max = item.raw;
            state.locals.string_is_range = false;
        }
        tags::local_tag::STRING_MINIMUM => {
            state.locals.string_min = item.raw;
            state.locals.string_is_range = true;
        }
        tags::local_tag::STRING_MAXIMUM => {
            state.locals.string_max = item.raw;
            state.locals.string_is_range = true;
        }
        tags::local_tag::DELIMITER => return Err(HidParseError::Unimplemented("delimiters")),
        tag => return Err(HidParseError::UnknownTag { tag, item_type: "local" }),
    }
    Ok(())
}
