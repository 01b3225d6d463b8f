//! Builds the relocatable preparsed blob (`spec.md` §3.2, §4.6) out of the
//! four capability vectors a finished [`ParserState`] holds.

use crate::alloc::PreparsedAlloc;
use crate::caps::ValueCaps;
use crate::error::HidParseError;
use crate::state::ParserState;

/// Identifies a preparsed blob produced by this crate, the way the original
/// format's first word is a magic tag (`spec.md` §3.2).
pub(crate) const PREPARSED_MAGIC: u32 = 0x4849_5030; // "HIP0"

/// Fixed header preceding the four concatenated `ValueCaps` arrays. Every
/// `*_caps_start`/`*_caps_end` is an *element index* into the logical
/// `[input..output..feature..collections]` array, never a byte offset or
/// pointer, so the blob stays position-independent (`spec.md` §6.3).
#[derive(Clone, Copy, Debug)]
pub struct PreparsedHeader {
    pub magic: u32,
    pub size: u32,
    pub usage_page: u16,
    pub usage: u16,

    pub input_caps_start: u32,
    pub input_caps_count: u32,
    pub input_caps_end: u32,
    pub input_report_byte_length: u16,

    pub output_caps_start: u32,
    pub output_caps_count: u32,
    pub output_caps_end: u32,
    pub output_report_byte_length: u16,

    pub feature_caps_start: u32,
    pub feature_caps_count: u32,
    pub feature_caps_end: u32,
    pub feature_report_byte_length: u16,

    pub number_link_collection_nodes: u16,
}

/// The parser's output: a self-contained, owned byte block plus the header
/// describing how to slice it (`spec.md` §3.2, §6.3). `blob` came out of the
/// caller's [`PreparsedAlloc`]; dropping `PreparsedData` returns it.
pub struct PreparsedData {
    pub(crate) header: PreparsedHeader,
    pub(crate) blob: Box<[u8]>,
}

impl PreparsedData {
    fn caps_slice(&self, start: u32, count: u32) -> &[ValueCaps] {
        let cap_size = core::mem::size_of::<ValueCaps>();
        let byte_start = start as usize * cap_size;
        let byte_end = byte_start + count as usize * cap_size;
        bytemuck::cast_slice(&self.blob[byte_start..byte_end])
    }

    pub fn header(&self) -> &PreparsedHeader {
        &self.header
    }

    pub fn input_caps(&self) -> &[ValueCaps] {
        self.caps_slice(self.header.input_caps_start, self.header.input_caps_count)
    }

    pub fn output_caps(&self) -> &[ValueCaps] {
        self.caps_slice(self.header.output_caps_start, self.header.output_caps_count)
    }

    pub fn feature_caps(&self) -> &[ValueCaps] {
        self.caps_slice(self.header.feature_caps_start, self.header.feature_caps_count)
    }

    pub fn collection_caps(&self) -> &[ValueCaps] {
        self.caps_slice(self.header.feature_caps_end, self.header.number_link_collection_nodes as u32)
    }
}

/// Assembles a [`PreparsedData`] from a finished parser state (`spec.md`
/// §4.6): compute the total element count, ask the caller's allocator for a
/// blob of that many bytes, zero-fill, then copy the four arrays in order
/// and write the header.
pub(crate) fn build(
    state: &ParserState,
    top_level_usage_page: u16,
    top_level_usage: u16,
    alloc: &mut impl PreparsedAlloc,
) -> Result<PreparsedData, HidParseError> {
    let cap_size = core::mem::size_of::<ValueCaps>();

    let input_count = state.input_caps.len() as u32;
    let output_count = state.output_caps.len() as u32;
    let feature_count = state.feature_caps.len() as u32;
    let collection_count = state.collection_caps.len() as u32;
    let caps_len = input_count + output_count + feature_count + collection_count;

    let byte_len = caps_len as usize * cap_size;
    let mut blob = alloc.alloc(byte_len)?;

    let mut offset = 0usize;
    for caps in [&state.input_caps, &state.output_caps, &state.feature_caps, &state.collection_caps] {
        let bytes = bytemuck::cast_slice(caps.as_slice());
        blob[offset..offset + bytes.len()].copy_from_slice(bytes);
        offset += bytes.len();
    }

    let input_caps_start = 0u32;
    let input_caps_end = input_caps_start + input_count;
    let output_caps_start = input_caps_end;
    let output_caps_end = output_caps_start + output_count;
    let feature_caps_start = output_caps_end;
    let feature_caps_end = feature_caps_start + feature_count;

    let header = PreparsedHeader {
        magic: PREPARSED_MAGIC,
        size: byte_len as u32,
        usage_page: top_level_usage_page,
        usage: top_level_usage,
        input_caps_start,
        input_caps_count: input_count,
        input_caps_end,
        input_report_byte_length: state.report_byte_length[0],
        output_caps_start,
        output_caps_count: output_count,
        output_caps_end,
        output_report_byte_length: state.report_byte_length[1],
        feature_caps_start,
        feature_caps_count: feature_count,
        feature_caps_end,
        feature_report_byte_length: state.report_byte_length[2],
        number_link_collection_nodes: state.number_link_collection_nodes,
    };

    Ok(PreparsedData { header, blob })
}
