//! Walks a finished preparsed blob to produce the top-level
//! [`DeviceDescription`] a caller actually wants (`spec.md` §4.7, §6.4).

use crate::caps::ValueCaps;
use crate::error::ParseWarning;
use crate::preparsed::PreparsedData;

/// Summarizes the single top-level application collection (`spec.md`
/// §6.4's `CollectionDesc`, length always 1 — nested collections live in
/// the blob but are not separately summarized here).
#[derive(Clone, Debug)]
pub struct CollectionDesc {
    pub usage_page: u16,
    pub usage: u16,
    pub collection_number: u8,
    pub input_length: u16,
    pub output_length: u16,
    pub feature_length: u16,
    pub preparsed_data_length: u32,
}

/// One distinct report ID seen in any direction, with its per-direction
/// byte length (`spec.md` §4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportIdDesc {
    pub report_id: u8,
    pub collection_number: u8,
    pub input_length: u16,
    pub output_length: u16,
    pub feature_length: u16,
}

/// The crate's public result type (`spec.md` §6.4): the collection summary,
/// the distinct report IDs, the preparsed blob they were derived from, and
/// any non-fatal faults encountered along the way. Dropping this drops the
/// blob with it — there is no separate free call (`spec.md` §6.1, Open
/// Question resolution in `DESIGN.md`).
pub struct DeviceDescription {
    pub collection: CollectionDesc,
    pub report_ids: Vec<ReportIdDesc>,
    pub preparsed: PreparsedData,
    pub warnings: Vec<ParseWarning>,
}

fn field_end_bytes(cap: &ValueCaps) -> u32 {
    let end_bits = cap.start_byte as u32 * 8 + cap.start_bit as u32 + cap.bit_size as u32 * cap.report_count as u32;
    (end_bits + 7) / 8
}

pub(crate) fn describe(preparsed: PreparsedData, warnings: Vec<ParseWarning>) -> DeviceDescription {
    let header = *preparsed.header();

    let collection = CollectionDesc {
        usage_page: header.usage_page,
        usage: header.usage,
        collection_number: 1,
        input_length: header.input_report_byte_length,
        output_length: header.output_report_byte_length,
        feature_length: header.feature_report_byte_length,
        preparsed_data_length: header.size,
    };

    // Track the max byte length seen per report ID per direction; a
    // report ID is "new" the first time any direction mentions it.
    let mut lengths = [[0u16; 256]; 3];
    let mut seen = [false; 256];

    for cap in preparsed.input_caps() {
        let len = field_end_bytes(cap) as u16;
        lengths[0][cap.report_id as usize] = lengths[0][cap.report_id as usize].max(len);
        seen[cap.report_id as usize] = true;
    }
    for cap in preparsed.output_caps() {
        let len = field_end_bytes(cap) as u16;
        lengths[1][cap.report_id as usize] = lengths[1][cap.report_id as usize].max(len);
        seen[cap.report_id as usize] = true;
    }
    for cap in preparsed.feature_caps() {
        let len = field_end_bytes(cap) as u16;
        lengths[2][cap.report_id as usize] = lengths[2][cap.report_id as usize].max(len);
        seen[cap.report_id as usize] = true;
    }

    let report_ids = (0u16..256)
        .filter(|&id| seen[id as usize])
        .map(|id| ReportIdDesc {
            report_id: id as u8,
            collection_number: 1,
            input_length: lengths[0][id as usize],
            output_length: lengths[1][id as usize],
            feature_length: lengths[2][id as usize],
        })
        .collect();

    DeviceDescription { collection, report_ids, preparsed, warnings }
}
