//! Confidence scorer.
//!
//! A record is HIGH only when nothing about it is a guess: the name split was confirmed by
//! initials (or there was nothing to split), and the date is present whenever the chosen format
//! needs it. Every other case is LOW and lists why, so a reviewer knows what to correct.

use crate::dates::{AppointmentDate, DateError};
use crate::format::OutputFormat;
use crate::names::{NameOutcome, ResolvedName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Low,
}

/// Non-fatal reasons a record needs manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    /// No anchor line, or nothing after it.
    AnchorNotFound,
    /// Multi-word name split without initials confirmation.
    AmbiguousName,
    /// Single-word name; the first name is an empty placeholder.
    MissingFirstName,
    /// The format needs an appointment date and none was found.
    DateNotFound,
    /// A date was found but its values are out of range.
    InvalidDate,
}

impl ReviewReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewReason::AnchorNotFound => "anchor_not_found",
            ReviewReason::AmbiguousName => "ambiguous_name",
            ReviewReason::MissingFirstName => "missing_first_name",
            ReviewReason::DateNotFound => "date_not_found",
            ReviewReason::InvalidDate => "invalid_date",
        }
    }

    /// Error-taxonomy family the reason belongs to.
    pub fn taxonomy(&self) -> &'static str {
        match self {
            ReviewReason::AnchorNotFound
            | ReviewReason::MissingFirstName
            | ReviewReason::DateNotFound => "FieldNotFound",
            ReviewReason::AmbiguousName => "AmbiguousName",
            ReviewReason::InvalidDate => "InvalidDate",
        }
    }
}

/// Result of the date resolver for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    NotFound,
    Invalid(DateError),
    Resolved(AppointmentDate),
}

impl DateField {
    pub fn date(&self) -> Option<AppointmentDate> {
        match self {
            DateField::Resolved(date) => Some(*date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub confidence: Confidence,
    pub reasons: Vec<ReviewReason>,
}

/// Scores one document's extraction results against `format`.
pub fn assess(name: Option<&ResolvedName>, date: &DateField, format: OutputFormat) -> Assessment {
    let mut reasons = Vec::new();

    match name.map(|n| n.outcome) {
        None => reasons.push(ReviewReason::AnchorNotFound),
        Some(NameOutcome::Fallback) => reasons.push(ReviewReason::AmbiguousName),
        Some(NameOutcome::SingleWord) => reasons.push(ReviewReason::MissingFirstName),
        Some(NameOutcome::InitialsMatched) => {}
    }

    if format.requires_appointment_date() {
        match date {
            DateField::NotFound => reasons.push(ReviewReason::DateNotFound),
            DateField::Invalid(_) => reasons.push(ReviewReason::InvalidDate),
            DateField::Resolved(_) => {}
        }
    }

    let confidence = if reasons.is_empty() {
        Confidence::High
    } else {
        Confidence::Low
    };

    Assessment { confidence, reasons }
}
