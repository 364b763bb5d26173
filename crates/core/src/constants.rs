//! Constants used throughout the chartname core crate.

/// Line content that marks the start of the patient-name block (compared case-sensitively).
pub const DEFAULT_ANCHOR_MARKER: &str = "Chart";

/// Extension of the sidecar text file left next to each document by the text extractor.
pub const DEFAULT_TEXT_EXTENSION: &str = "txt";

/// Extension of the documents this tool renames.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Characters that split a source filename into segments when looking for the initials token.
pub const INITIALS_SEPARATORS: [char; 2] = ['_', '-'];

/// Characters removed from synthesised filenames (path separators and Windows-reserved).
pub const INVALID_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '<', '>', '"', '|', '?', '*'];

/// Full English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Literal day-of-month bounds; no per-month day counts are applied.
pub const MIN_DAY: u32 = 1;
pub const MAX_DAY: u32 = 31;

/// Largest year that fits the four digits a date must be written with. Zero-padded years such
/// as `0999` are accepted.
pub const MAX_YEAR: u32 = 9999;

/// Filename of the batch review manifest written into the inbox.
pub const REVIEW_QUEUE_FILENAME: &str = "review-queue.yaml";
