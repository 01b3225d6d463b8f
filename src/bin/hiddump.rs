//! Thin inspection tool over [`hidparse::get_collection_description`]:
//! reads a binary report descriptor from a file and prints its report
//! layout. Display-only — no USB/HID device I/O happens here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hidparse::{CapsFlags, DefaultAlloc, ValueCaps};

#[derive(Parser)]
#[command(author, version, about = "Dump the preparsed layout of a USB-HID report descriptor")]
struct Args {
    /// Path to a file holding the raw descriptor bytes.
    path: PathBuf,

    /// Also print parse warnings (stack underflow, unclosed nesting).
    #[arg(long)]
    warnings: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("reading descriptor from {}", args.path.display()))?;

    let mut alloc = DefaultAlloc;
    let desc = hidparse::get_collection_description(&bytes, &mut alloc)
        .with_context(|| format!("parsing descriptor from {}", args.path.display()))?;

    println!(
        "top-level collection: {} ({} bytes preparsed)",
        usage_to_str(desc.collection.usage_page, desc.collection.usage),
        desc.collection.preparsed_data_length,
    );
    println!(
        "  input {} bytes, output {} bytes, feature {} bytes",
        desc.collection.input_length, desc.collection.output_length, desc.collection.feature_length
    );

    for report in &desc.report_ids {
        println!(
            "report id {}: input {} bytes, output {} bytes, feature {} bytes",
            report.report_id, report.input_length, report.output_length, report.feature_length
        );
    }

    println!("\ncollections:");
    for (index, node) in desc.preparsed.collection_caps().iter().enumerate() {
        println!(
            "  [{index}] {} parent {} usage {}",
            collection_type_name(node.collection_type()),
            node.link_collection,
            usage_to_str(node.usage_page, node.usage_min),
        );
    }

    println!("\ninput fields:");
    for cap in desc.preparsed.input_caps() {
        print_field(cap);
    }
    println!("\noutput fields:");
    for cap in desc.preparsed.output_caps() {
        print_field(cap);
    }
    println!("\nfeature fields:");
    for cap in desc.preparsed.feature_caps() {
        print_field(cap);
    }

    if args.warnings {
        println!("\nwarnings:");
        for warning in &desc.warnings {
            println!("  {warning}");
        }
    }

    Ok(())
}

fn print_field(cap: &ValueCaps) {
    let kind = if cap.flags.contains(CapsFlags::IS_CONSTANT) {
        "const"
    } else if cap.flags.contains(CapsFlags::IS_BUTTON) {
        "button"
    } else {
        "value"
    };
    println!(
        "  report {} byte {} bit {} size {} count {} [{}] ({}) {}",
        cap.report_id,
        cap.start_byte,
        cap.start_bit,
        cap.bit_size,
        cap.report_count,
        kind,
        main_item_flags_str(cap),
        usage_to_str(cap.usage_page, cap.usage_min),
    );
}

/// Renders the raw Main-item bits (`spec.md` §3.1 `bit_field`) the way the
/// HID spec names them, independent of the parser-derived `CapsFlags` used
/// for `kind` above.
fn main_item_flags_str(cap: &ValueCaps) -> String {
    let flags = cap.main_flags();
    let mut parts = vec![
        if flags.is_constant() { "const" } else { "data" },
        if flags.is_variable() { "var" } else { "ary" },
        if flags.is_relative() { "rel" } else { "abs" },
    ];
    if flags.is_wrap() {
        parts.push("wrap");
    }
    if flags.is_nonlinear() {
        parts.push("nonlinear");
    }
    if flags.is_no_preferred() {
        parts.push("no-pref");
    }
    if flags.has_null_state() {
        parts.push("null");
    }
    if flags.is_volatile() {
        parts.push("volatile");
    }
    if flags.is_buffered_bytes() {
        parts.push("buf-bytes");
    }
    parts.join(",")
}

fn collection_type_name(collection_type: u8) -> &'static str {
    match collection_type {
        0x00 => "physical",
        0x01 => "application",
        0x02 => "logical",
        0x03 => "report",
        0x04 => "named_array",
        0x05 => "usage_switch",
        0x06 => "usage_modifier",
        _ => "vendor/reserved",
    }
}

fn usage_to_str(usage_page: u16, usage_id: u16) -> String {
    match hut::Usage::new_from_page_and_id(usage_page, usage_id) {
        Ok(usage) => format!("{} / {}", hut::UsagePage::from(&usage), usage),
        Err(_) => format!("{usage_page:#06x}/{usage_id:#06x}"),
    }
}
