//! Chartname File Placement
//!
//! This crate moves a source document to its synthesised destination name without ever
//! silently overwriting an unrelated file.
//!
//! ## Collision Model
//!
//! - No occupant at the destination: the document is moved there directly
//! - Occupant with byte-identical content: the document is a re-run of one already placed,
//!   so the source is dropped and the occupant kept
//! - Occupant with different content: exactly one alternate name is tried,
//!   `<stem>_<fingerprint>.<ext>`, where the fingerprint derives solely from the source bytes
//! - Alternate also occupied by different content: [`FilesError::CollisionExhausted`]
//!
//! Occupancy is re-read from the filesystem on every call; nothing is cached between files.
//!
//! ## Example Usage
//!
//! ```no_run
//! use chartname_files::RenameWriter;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = RenameWriter::new(Path::new("processed"))?;
//! let receipt = writer.place(Path::new("inbox/chart.pdf"), "Patient, Test 121825 PT Note.pdf")?;
//! println!("fingerprint {}", receipt.fingerprint.short());
//! # Ok(())
//! # }
//! ```

mod fingerprint;
mod writer;

pub use fingerprint::{ContentFingerprint, SHORT_FINGERPRINT_LEN};
pub use writer::{CollisionResolution, RenameWriter, WriteReceipt};

/// Errors that can occur while placing a document.
///
/// Messages name the destination directory or the source file only. Destination file
/// names embed patient names and are never included.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Destination directory does not exist or is not a directory
    #[error("Invalid destination directory: {0}")]
    InvalidDirectory(String),

    /// Path validation failed (separator in a file name, missing file name, bad fingerprint)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Both the exact destination and its fingerprinted alternate hold unrelated files
    #[error("destination and fingerprinted alternate are both occupied (fingerprint {fingerprint})")]
    CollisionExhausted { fingerprint: String },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilesError {
    /// Stable taxonomy label used in logs and batch reports.
    pub fn label(&self) -> &'static str {
        match self {
            FilesError::InvalidDirectory(_) => "InvalidDirectory",
            FilesError::InvalidPath(_) => "InvalidPath",
            FilesError::CollisionExhausted { .. } => "CollisionExhausted",
            FilesError::Io(_) => "Io",
        }
    }
}
