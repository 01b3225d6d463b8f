//! Expands a Main item (Input/Output/Feature) into one or more [`ValueCaps`]
//! records (`spec.md` §4.5). This is the densest part of the parser: it owns
//! the per-(direction, report ID) bit cursor, the array/variable expansion
//! rules, and data-index allocation.

use crate::caps::{CapsFlags, MainItemFlags, ValueCaps};
use crate::error::{HidParseError, ParseWarning};
use crate::state::ParserState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input = 0,
    Output = 1,
    Feature = 2,
}

impl Direction {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Per-slot usage identity plus the flags every emitted record shares,
/// computed once per Main item so the variable/array branches don't repeat
/// it.
struct ItemContext {
    report_id: u8,
    bit_size: u32,
    base_flags: CapsFlags,
}

pub(crate) fn emit_main_item(
    state: &mut ParserState,
    direction: Direction,
    raw_flags: u32,
) -> Result<(), HidParseError> {
    let main_flags = MainItemFlags(raw_flags);
    let report_id = state.globals.report_id;
    let bit_size = state.globals.bit_size;
    let count = state.globals.report_count;
    let dir_idx = direction.index();

    // Step 1: advance the (direction, report_id) bit cursor. The first
    // write on a cursor reserves byte 0 for the report ID prefix, but only
    // when a Report ID is actually in use — a descriptor that never emits
    // REPORT_ID (report_id == 0) has no prefix byte to reserve.
    let cursor = &mut state.bit_cursor[dir_idx][report_id as usize];
    if *cursor == 0 && report_id != 0 {
        *cursor = 8;
    }
    *cursor += bit_size * count;
    let cursor_end = *cursor;
    let byte_len = ((cursor_end + 7) / 8) as u16;
    state.report_byte_length[dir_idx] = state.report_byte_length[dir_idx].max(byte_len);

    let is_array = !main_flags.is_variable();
    let is_absolute = !main_flags.is_relative();
    let is_constant = main_flags.is_constant();
    let is_button = bit_size == 1 || is_array;

    if count == 0 {
        // A zero-count field still advanced the cursor (spec.md §4.5 edge
        // case) but emits no records.
        state.locals.clear();
        return Ok(());
    }

    let mut base_flags = CapsFlags::empty();
    if state.locals.usage_is_range {
        base_flags.insert(CapsFlags::IS_RANGE);
    }
    if state.locals.designator_is_range {
        base_flags.insert(CapsFlags::IS_DESIGNATOR_RANGE);
    }
    if state.locals.string_is_range {
        base_flags.insert(CapsFlags::IS_STRING_RANGE);
    }
    if is_absolute {
        base_flags.insert(CapsFlags::IS_ABSOLUTE);
    }
    if is_constant {
        base_flags.insert(CapsFlags::IS_CONSTANT);
    }
    if is_button {
        base_flags.insert(CapsFlags::IS_BUTTON);
    }

    let ctx = ItemContext { report_id, bit_size, base_flags };
    let usage_count = state.locals.usages_size.max(1) as u32;

    if is_array {
        emit_array(state, direction, &ctx, raw_flags, cursor_end, count, usage_count);
    } else {
        emit_variable(state, direction, &ctx, raw_flags, cursor_end, count, usage_count)?;
    }

    state.locals.clear();
    Ok(())
}

fn make_caps(
    state: &ParserState,
    ctx: &ItemContext,
    direction: Direction,
    raw_flags: u32,
    usage_page: u16,
    usage_min: u16,
    usage_max: u16,
    start_bits: u32,
    report_count: u32,
    flags: CapsFlags,
) -> ValueCaps {
    let dir_idx = direction.index();
    let data_index_min = state.next_data_index[dir_idx];
    let data_index_max = data_index_min + (usage_max as u32).saturating_sub(usage_min as u32);

    ValueCaps {
        logical_min: state.globals.logical_min,
        logical_max: state.globals.logical_max,
        physical_min: state.globals.physical_min,
        physical_max: state.globals.physical_max,
        units: state.globals.units,
        bit_field: raw_flags,
        usage_page,
        usage_min,
        usage_max,
        start_byte: (start_bits / 8) as u16,
        report_count: report_count as u16,
        data_index_min: data_index_min as u16,
        data_index_max: data_index_max as u16,
        designator_min: state.locals.designator_min as u16,
        designator_max: state.locals.designator_max as u16,
        string_min: state.locals.string_min as u16,
        string_max: state.locals.string_max as u16,
        link_collection: state.link_collection,
        link_usage_page: state.link_usage_page,
        link_usage: state.link_usage,
        report_id: ctx.report_id,
        start_bit: (start_bits % 8) as u8,
        bit_size: ctx.bit_size as u8,
        units_exp: state.globals.units_exp as i8,
        flags,
        ..Default::default()
    }
}

/// Advances the direction's data-index allocator the same way
/// [`make_caps`] computed `data_index_max`, per `spec.md` §4.5 step 9: the
/// allocator only moves past a usage that is non-zero in either bound.
fn advance_data_index(state: &mut ParserState, direction: Direction, usage_min: u16, usage_max: u16) {
    if usage_min != 0 || usage_max != 0 {
        let dir_idx = direction.index();
        let data_index_min = state.next_data_index[dir_idx];
        let data_index_max = data_index_min + (usage_max as u32).saturating_sub(usage_min as u32);
        state.next_data_index[dir_idx] = data_index_max + 1;
    }
}

/// Array fields (`spec.md` §4.5 step 8): `U` records sharing one
/// `(start_byte, start_bit, bit_size, report_count)` base, aligned to the
/// beginning of the whole array. `ARRAY_HAS_MORE` is set on all but the
/// last record.
fn emit_array(
    state: &mut ParserState,
    direction: Direction,
    ctx: &ItemContext,
    raw_flags: u32,
    cursor_end: u32,
    count: u32,
    usage_count: u32,
) {
    let array_start_bits = cursor_end - ctx.bit_size * count;

    for slot in 0..usage_count as usize {
        let (page, min, max) = state.locals.usage_slot(slot, state.globals.usage_page);
        let mut flags = ctx.base_flags;
        if slot + 1 < usage_count as usize {
            flags.insert(CapsFlags::ARRAY_HAS_MORE);
        }

        let cap = make_caps(state, ctx, direction, raw_flags, page, min, max, array_start_bits, count, flags);
        advance_data_index(state, direction, min, max);
        state.caps_for(direction).push(cap);
    }
}

/// Variable fields (`spec.md` §4.5 step 7): one record per usage slot,
/// emitted from the last slot to the first. The first emitted record
/// (slot 0, emitted last) absorbs `count - (usage_count - 1)` of the
/// report count; every other record gets exactly 1.
fn emit_variable(
    state: &mut ParserState,
    direction: Direction,
    ctx: &ItemContext,
    raw_flags: u32,
    cursor_end: u32,
    count: u32,
    usage_count: u32,
) -> Result<(), HidParseError> {
    if count < usage_count {
        return Err(HidParseError::MalformedVariableField { report_count: count, usage_count });
    }

    let mut cursor = cursor_end;
    for slot in (0..usage_count as usize).rev() {
        let this_count = if slot == 0 { count - (usage_count - 1) } else { 1 };
        cursor -= ctx.bit_size * this_count;

        let (page, min, max) = state.locals.usage_slot(slot, state.globals.usage_page);
        let cap = make_caps(state, ctx, direction, raw_flags, page, min, max, cursor, this_count, ctx.base_flags);
        advance_data_index(state, direction, min, max);
        state.caps_for(direction).push(cap);
    }
    Ok(())
}

/// `COLLECTION` (`spec.md` §4.4): records a collection-type node in the
/// collections array and makes it the new enclosing collection for
/// everything nested inside it, restoring the previous one on the matching
/// `END_COLLECTION`.
pub(crate) fn handle_collection(state: &mut ParserState, collection_type: u8) -> Result<(), HidParseError> {
    state.push_collection()?;

    let node_index = state.number_link_collection_nodes;
    let (usage_page, usage_min, usage_max) = state.locals.usage_slot(0, state.globals.usage_page);

    let node = ValueCaps {
        report_id: collection_type,
        usage_page,
        usage_min,
        usage_max,
        link_collection: state.link_collection,
        ..Default::default()
    };
    state.collection_caps.push(node);

    state.link_collection = node_index;
    state.link_usage_page = usage_page;
    state.link_usage = usage_min;
    if node_index == 0 {
        state.top_level_usage_page = usage_page;
        state.top_level_usage = usage_min;
    }
    state.number_link_collection_nodes += 1;
    state.locals.clear();
    Ok(())
}

/// `END_COLLECTION` (`spec.md` §4.4): restores the enclosing collection's
/// link triple. Popping an empty stack is a warning, not fatal.
pub(crate) fn handle_end_collection(state: &mut ParserState, warnings: &mut Vec<ParseWarning>) {
    state.pop_collection(warnings);
    state.locals.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ParserState;

    fn setup_variable_buttons(report_count: u32, usages: &[(u16, u16)]) -> ParserState {
        let mut state = ParserState::new();
        state.globals.bit_size = 1;
        state.globals.report_count = report_count;
        state.globals.logical_min = 0;
        state.globals.logical_max = 1;
        for (i, (min, max)) in usages.iter().enumerate() {
            state.locals.usages_min[i] = *min;
            state.locals.usages_max[i] = *max;
        }
        state.locals.usages_size = usages.len();
        state
    }

    #[test]
    fn variable_usage_range_emits_one_record_covering_the_whole_range() {
        // Usage Minimum 1, Usage Maximum 3, Report Count 3 -> one IS_RANGE
        // record with report_count == 3 and 3 contiguous data indices.
        let mut state = setup_variable_buttons(3, &[(1, 3)]);
        state.locals.usage_is_range = true;
        emit_main_item(&mut state, Direction::Input, 0b010).unwrap(); // Data, Var, Abs

        assert_eq!(state.input_caps.len(), 1);
        let cap = state.input_caps[0];
        assert_eq!(cap.report_count, 3);
        assert!(cap.flags.contains(CapsFlags::IS_RANGE));
        assert!(cap.flags.contains(CapsFlags::IS_BUTTON));
        assert_eq!(cap.data_index_min, 0);
        assert_eq!(cap.data_index_max, 2);
    }

    #[test]
    fn variable_usage_list_emits_one_record_per_usage() {
        // Three explicit Usage tags (list mode), Report Count 3.
        let mut state = setup_variable_buttons(3, &[(0x30, 0x30), (0x31, 0x31), (0x38, 0x38)]);
        emit_main_item(&mut state, Direction::Input, 0b010).unwrap();

        assert_eq!(state.input_caps.len(), 3);
        let total: u16 = state.input_caps.iter().map(|c| c.report_count).sum();
        assert_eq!(total, 3);
        for cap in &state.input_caps {
            assert!(!cap.flags.contains(CapsFlags::IS_RANGE));
        }
    }

    #[test]
    fn array_field_shares_base_offset_and_sets_has_more() {
        let mut state = ParserState::new();
        state.globals.bit_size = 8;
        state.globals.report_count = 6;
        state.locals.usages_min[0] = 0;
        state.locals.usages_max[0] = 101;
        state.locals.usages_size = 1;
        state.locals.usage_is_range = true;
        emit_main_item(&mut state, Direction::Input, 0b000).unwrap(); // Data, Ary, Abs

        assert_eq!(state.input_caps.len(), 1);
        let cap = state.input_caps[0];
        assert_eq!(cap.report_count, 6);
        assert_eq!(cap.bit_size, 8);
        assert!(!cap.flags.contains(CapsFlags::ARRAY_HAS_MORE));
    }

    #[test]
    fn constant_field_is_recorded_not_skipped() {
        let mut state = ParserState::new();
        state.globals.bit_size = 5;
        state.globals.report_count = 1;
        emit_main_item(&mut state, Direction::Input, 0b001).unwrap(); // constant
        assert_eq!(state.input_caps.len(), 1);
        assert!(state.input_caps[0].flags.contains(CapsFlags::IS_CONSTANT));
    }

    #[test]
    fn zero_report_count_advances_cursor_but_emits_nothing() {
        let mut state = ParserState::new();
        state.globals.bit_size = 8;
        state.globals.report_count = 0;
        emit_main_item(&mut state, Direction::Input, 0b010).unwrap();
        assert!(state.input_caps.is_empty());
        // report_id 0 (no REPORT_ID tag) reserves no prefix byte, so the
        // cursor starts at 0, not 8.
        assert_eq!(state.bit_cursor[Direction::Input.index()][0], 0);
    }

    #[test]
    fn report_id_reserves_first_byte() {
        let mut state = ParserState::new();
        state.globals.report_id = 1;
        state.globals.bit_size = 8;
        state.globals.report_count = 1;
        emit_main_item(&mut state, Direction::Input, 0b010).unwrap();
        let cap = state.input_caps[0];
        assert_eq!(cap.report_id, 1);
        assert!(cap.start_byte as u32 * 8 + cap.start_bit as u32 >= 8);
    }

    #[test]
    fn variable_with_fewer_counts_than_usages_is_rejected() {
        let mut state = setup_variable_buttons(1, &[(1, 1), (2, 2), (3, 3)]);
        let err = emit_main_item(&mut state, Direction::Input, 0b010).unwrap_err();
        assert!(matches!(err, HidParseError::MalformedVariableField { .. }));
    }

    #[test]
    fn collection_nodes_link_to_their_parent() {
        let mut state = ParserState::new();
        state.globals.usage_page = 0x01;
        state.locals.usages_min[0] = 0x02;
        state.locals.usages_max[0] = 0x02;
        handle_collection(&mut state, 0x01).unwrap(); // top-level Application

        assert_eq!(state.top_level_usage_page, 0x01);
        assert_eq!(state.top_level_usage, 0x02);
        assert_eq!(state.link_collection, 0);

        state.locals.usages_min[0] = 0x05;
        state.locals.usages_max[0] = 0x05;
        handle_collection(&mut state, 0x02).unwrap(); // nested Logical

        assert_eq!(state.collection_caps[1].link_collection, 0);
        assert_eq!(state.link_collection, 1);

        let mut warnings = Vec::new();
        handle_end_collection(&mut state, &mut warnings);
        assert_eq!(state.link_collection, 0);
        handle_end_collection(&mut state, &mut warnings);
        assert!(warnings.is_empty());
    }

    #[test]
    fn end_collection_underflow_is_a_warning_not_an_error() {
        let mut state = ParserState::new();
        let mut warnings = Vec::new();
        handle_end_collection(&mut state, &mut warnings);
        assert_eq!(warnings, vec![ParseWarning::CollectionStackUnderflow]);
    }
}
