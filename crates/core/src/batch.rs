//! Batch processing and the review queue.
//!
//! A batch is a list of documents run through [`DocumentPipeline::process`] one at a time. A
//! failing document is recorded and the batch moves on; documents needing review are collected
//! into a [`ReviewQueue`] that can be written next to the inbox for a reviewer to work through.
//!
//! The queue file lists source filenames and reason codes only. Names and dates are never
//! persisted: the reviewer opens the document itself.

use crate::confidence::ReviewReason;
use crate::constants::DOCUMENT_EXTENSION;
use crate::extractor::{source_name, TextExtractor};
use crate::format::OutputFormat;
use crate::pipeline::{DocumentPipeline, PendingReview, ProcessOutcome};
use crate::{PipelineError, PipelineResult};
use chartname_files::WriteReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub label: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub renamed: Vec<WriteReceipt>,
    pub pending: Vec<PendingReview>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.renamed.len() + self.pending.len() + self.failed.len()
    }

    /// Review queue for the pending documents of this batch.
    pub fn review_queue(&self, format: OutputFormat) -> ReviewQueue {
        ReviewQueue {
            generated_at: Utc::now(),
            format,
            entries: self
                .pending
                .iter()
                .map(|pending| ReviewQueueEntry {
                    source_filename: source_name(&pending.source),
                    reasons: pending.reasons().to_vec(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQueue {
    pub generated_at: DateTime<Utc>,
    pub format: OutputFormat,
    pub entries: Vec<ReviewQueueEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQueueEntry {
    pub source_filename: String,
    pub reasons: Vec<ReviewReason>,
}

impl<E: TextExtractor> DocumentPipeline<E> {
    /// Processes each document in order. Per-document errors never abort the batch.
    pub fn process_batch(&self, sources: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();

        for source in sources {
            match self.process(source) {
                Ok(ProcessOutcome::Renamed(receipt)) => report.renamed.push(receipt),
                Ok(ProcessOutcome::NeedsReview(pending)) => report.pending.push(pending),
                Err(e) => {
                    tracing::warn!(
                        source = %source_name(source),
                        label = e.label(),
                        "document failed: {}",
                        e
                    );
                    report.failed.push(BatchFailure {
                        source: source.clone(),
                        label: e.label(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            total = report.total(),
            renamed = report.renamed.len(),
            pending = report.pending.len(),
            failed = report.failed.len(),
            "batch complete"
        );

        report
    }
}

/// Documents directly inside `dir`, sorted by path. Extension match ignores case.
pub fn list_documents(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(PipelineError::DirectoryRead)?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry.map_err(PipelineError::DirectoryRead)?.path();
        let is_document = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
        if is_document {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

pub fn write_review_queue(path: &Path, queue: &ReviewQueue) -> PipelineResult<()> {
    let yaml = serde_yaml::to_string(queue).map_err(PipelineError::ManifestSerialization)?;
    fs::write(path, yaml).map_err(PipelineError::ManifestWrite)
}

pub fn read_review_queue(path: &Path) -> PipelineResult<ReviewQueue> {
    let contents = fs::read_to_string(path).map_err(PipelineError::ManifestRead)?;
    serde_yaml::from_str(&contents).map_err(PipelineError::ManifestDeserialization)
}
