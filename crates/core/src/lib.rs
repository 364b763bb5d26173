//! # Chartname Core
//!
//! Core logic for renaming exported patient chart documents.
//!
//! This crate turns the extracted text of one chart document into a destination filename and
//! moves the document there:
//! - field location (display name after the anchor line, first date-shaped substring)
//! - name splitting guided by the initials in the source filename
//! - date parsing and confidence scoring
//! - filename synthesis and collision-safe placement via `chartname-files`
//!
//! **No text extraction**: turning a PDF into text belongs to an external extractor behind the
//! [`TextExtractor`] seam. **No patient data in logs**: events carry source filenames, labels and
//! fingerprints only.

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod format;
pub mod pipeline;
pub mod validation;

pub mod confidence;
pub mod dates;
pub mod locator;
pub mod names;
pub mod patient;
pub mod synth;

pub use batch::{
    list_documents, read_review_queue, write_review_queue, BatchFailure, BatchReport,
    ReviewQueue, ReviewQueueEntry,
};
pub use confidence::{Confidence, ReviewReason};
pub use config::{dir_from_env_value, format_from_env_value, ConfigOverrides, CoreConfig};
pub use dates::{AppointmentDate, DateError};
pub use error::{PipelineError, PipelineResult};
pub use extractor::{ExtractedText, ExtractionError, SidecarTextExtractor, TextExtractor};
pub use format::OutputFormat;
pub use locator::DateCode;
pub use names::NameOutcome;
pub use patient::{PatientInfo, ReviewCorrection};
pub use pipeline::{DocumentPipeline, PendingReview, ProcessOutcome};
pub use synth::SynthesisError;
