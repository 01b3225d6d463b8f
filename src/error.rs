//! Error taxonomy (`spec.md` §7): fatal kinds are returned as `Err`; the two
//! warning-level faults never abort a parse and are instead collected into
//! `Vec<ParseWarning>` and traced via [`tracing::warn!`].

use thiserror::Error;

/// Fatal parse errors. The descriptor that produced one of these is
/// structurally invalid and is never retried — there is no partial
/// `PreparsedData` to recover.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HidParseError {
    #[error("item truncated: its size byte(s) extend past the end of the descriptor")]
    DescriptorTruncated,

    #[error("unrecognized tag 0x{tag:02x} in a {item_type} item")]
    UnknownTag { tag: u8, item_type: &'static str },

    #[error("long item or reserved item type encountered (long items are recognized, not decoded)")]
    ReservedItemType,

    #[error("global item stack depth exceeded its growth cap")]
    StackOverflow,

    #[error("more than 256 local usages were declared before a Main item")]
    UsageOverflow,

    #[error("{0} are not supported")]
    Unimplemented(&'static str),

    #[error(
        "variable Main item declares report_count {report_count} smaller than its usage count {usage_count}"
    )]
    MalformedVariableField { report_count: u32, usage_count: u32 },

    #[error("allocator could not provide {bytes} bytes for the preparsed blob")]
    AllocFailure { bytes: usize },
}

/// Non-fatal faults (`spec.md` §7: `StackUnderflow`, `UnfinishedNesting`).
/// The parser keeps going when one of these occurs; they are surfaced to the
/// caller as values instead of only as a log line, since a library has no
/// business assuming its caller has a `tracing` subscriber installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarning {
    GlobalStackUnderflow,
    CollectionStackUnderflow,
    UnfinishedGlobalNesting,
    UnfinishedCollectionNesting,
}

impl ParseWarning {
    pub fn message(self) -> &'static str {
        match self {
            Self::GlobalStackUnderflow => "Pop with an empty global item stack",
            Self::CollectionStackUnderflow => "EndCollection with an empty collection stack",
            Self::UnfinishedGlobalNesting => "descriptor ended with an unbalanced Push",
            Self::UnfinishedCollectionNesting => "descriptor ended with an unclosed Collection",
        }
    }
}

impl core::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
