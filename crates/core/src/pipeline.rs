//! Document pipeline.
//!
//! Two entry points:
//! - the automatic path ([`DocumentPipeline::process`]) runs locator, resolvers and scorer, and
//!   either renames the document or hands back a [`PendingReview`];
//! - the resume path ([`DocumentPipeline::resume`]) takes a reviewer's replacement values and
//!   continues straight to synthesis and placement.
//!
//! Review is a suspension, not a wait: nothing is held between the two calls, so they can live
//! in separate request/response cycles. Each document is independent; the only shared state is
//! the destination directory, which the writer re-reads on every placement.

use crate::confidence::{assess, DateField, ReviewReason};
use crate::config::CoreConfig;
use crate::dates::resolve_date;
use crate::extractor::{source_name, ExtractedText, SidecarTextExtractor, TextExtractor};
use crate::locator::{locate_fields, DateCode};
use crate::names::{resolve_name, Initials};
use crate::patient::{PatientInfo, ReviewCorrection};
use crate::synth::synthesize_filename;
use crate::{PipelineError, PipelineResult};
use chartname_files::{RenameWriter, WriteReceipt};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A document whose record needs a human before it can be renamed.
#[derive(Debug, Clone)]
pub struct PendingReview {
    pub source: PathBuf,
    pub info: PatientInfo,
}

impl PendingReview {
    pub fn reasons(&self) -> &[ReviewReason] {
        self.info.review_reasons()
    }
}

#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Renamed(WriteReceipt),
    NeedsReview(PendingReview),
}

pub struct DocumentPipeline<E = SidecarTextExtractor> {
    cfg: Arc<CoreConfig>,
    extractor: E,
    today: Option<NaiveDate>,
}

impl DocumentPipeline<SidecarTextExtractor> {
    /// Pipeline reading sidecar text files with the configured extension.
    pub fn from_config(cfg: Arc<CoreConfig>) -> Self {
        let extractor = SidecarTextExtractor::new(cfg.text_extension());
        Self::new(cfg, extractor)
    }
}

impl<E: TextExtractor> DocumentPipeline<E> {
    pub fn new(cfg: Arc<CoreConfig>, extractor: E) -> Self {
        Self {
            cfg,
            extractor,
            today: None,
        }
    }

    /// Fixes the date used by current-date formats.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Builds the record for one document. Pure: no filesystem access.
    pub fn analyse_text(&self, source_name: &str, text: &ExtractedText) -> PatientInfo {
        let fields = locate_fields(text, self.cfg.anchor_marker());
        let initials = Initials::from_filename(source_name);

        let resolved = fields
            .display_name
            .as_deref()
            .and_then(|name| resolve_name(name, initials));

        let date = match fields.date_text.as_deref() {
            None => DateField::NotFound,
            Some(raw) => match resolve_date(raw) {
                Ok(date) => DateField::Resolved(date),
                Err(e) => DateField::Invalid(e),
            },
        };

        let assessment = assess(resolved.as_ref(), &date, self.cfg.format());

        let reason_labels: Vec<&str> = assessment.reasons.iter().map(ReviewReason::label).collect();
        tracing::info!(
            source = %source_name,
            initials_present = initials.is_some(),
            confidence = ?assessment.confidence,
            reasons = ?reason_labels,
            "document analysed"
        );

        let (first_name, last_name, outcome) = match resolved {
            Some(name) => (name.first_name, name.last_name, Some(name.outcome)),
            None => (String::new(), String::new(), None),
        };

        PatientInfo::analysed(
            fields.display_name.unwrap_or_default(),
            first_name,
            last_name,
            date.date(),
            outcome,
            assessment.confidence,
            assessment.reasons,
        )
        .with_date_code(fields.date_code)
    }

    /// Extracts text and builds the record without touching the destination.
    pub fn analyse(&self, source: &Path) -> PipelineResult<PatientInfo> {
        let text = self.extract(source)?;
        Ok(self.analyse_text(&source_name(source), &text))
    }

    /// Destination filename a HIGH record would receive.
    pub fn proposed_filename(&self, info: &PatientInfo) -> PipelineResult<String> {
        Ok(synthesize_filename(info, self.cfg.format(), self.today())?)
    }

    /// Automatic path: extract, analyse, and rename or suspend for review.
    pub fn process(&self, source: &Path) -> PipelineResult<ProcessOutcome> {
        let text = self.extract(source)?;
        self.process_text(source, &text)
    }

    /// Automatic path with text supplied by the caller.
    pub fn process_text(&self, source: &Path, text: &ExtractedText) -> PipelineResult<ProcessOutcome> {
        let info = self.analyse_text(&source_name(source), text);

        if info.needs_review() {
            tracing::info!(source = %source_name(source), "routed to manual review");
            return Ok(ProcessOutcome::NeedsReview(PendingReview {
                source: source.to_path_buf(),
                info,
            }));
        }

        let receipt = self.place(source, &info)?;
        Ok(ProcessOutcome::Renamed(receipt))
    }

    /// Resume path: the reviewer's values replace the record wholesale and are trusted.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidCorrection` if the supplied date or date code does not parse,
    /// or if the format needs a date and none was supplied. Placement errors propagate as usual.
    pub fn resume(&self, source: &Path, correction: ReviewCorrection) -> PipelineResult<WriteReceipt> {
        let format = self.cfg.format();

        let date = correction
            .appointment_date
            .as_deref()
            .map(resolve_date)
            .transpose()
            .map_err(|e| PipelineError::InvalidCorrection(format!("appointment date: {}", e)))?;

        if format.requires_appointment_date() && date.is_none() {
            return Err(PipelineError::InvalidCorrection(format!(
                "format {} requires an appointment date",
                format
            )));
        }

        let date_code = match correction.date_code.as_deref() {
            Some(raw) => Some(DateCode::parse(raw).ok_or_else(|| {
                PipelineError::InvalidCorrection(
                    "date code must be DOI or DOB followed by six digits".into(),
                )
            })?),
            None => None,
        };

        let info = PatientInfo::confirmed(&correction.first_name, &correction.last_name, date)
            .with_date_code(date_code);
        tracing::info!(source = %source_name(source), "resuming with reviewer correction");

        self.place(source, &info)
    }

    fn extract(&self, source: &Path) -> PipelineResult<ExtractedText> {
        self.extractor.extract(source).map_err(|e| {
            tracing::warn!(source = %source_name(source), label = "ExtractionFailure", "no usable text");
            PipelineError::from(e)
        })
    }

    fn place(&self, source: &Path, info: &PatientInfo) -> PipelineResult<WriteReceipt> {
        let file_name = synthesize_filename(info, self.cfg.format(), self.today())?;

        let destination_dir = self.cfg.destination_dir_for(source);
        std::fs::create_dir_all(&destination_dir).map_err(PipelineError::DestinationDirCreation)?;

        let writer = RenameWriter::new(&destination_dir)?;
        Ok(writer.place(source, &file_name)?)
    }
}
