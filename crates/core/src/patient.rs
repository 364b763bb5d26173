//! Patient information record.
//!
//! A [`PatientInfo`] is built once per document and never modified. Review does not patch a
//! record: the reviewer's [`ReviewCorrection`] produces a whole new one.

use crate::confidence::{Confidence, ReviewReason};
use crate::dates::AppointmentDate;
use crate::locator::DateCode;
use crate::names::NameOutcome;
use chartname_types::NonEmptyText;

#[derive(Clone, PartialEq, Eq)]
pub struct PatientInfo {
    raw_display_name: String,
    first_name: String,
    last_name: String,
    appointment_date: Option<AppointmentDate>,
    date_code: Option<DateCode>,
    confidence: Confidence,
    name_outcome: Option<NameOutcome>,
    review_reasons: Vec<ReviewReason>,
}

impl PatientInfo {
    /// Record produced by automatic analysis.
    pub(crate) fn analysed(
        raw_display_name: String,
        first_name: String,
        last_name: String,
        appointment_date: Option<AppointmentDate>,
        name_outcome: Option<NameOutcome>,
        confidence: Confidence,
        review_reasons: Vec<ReviewReason>,
    ) -> Self {
        Self {
            raw_display_name,
            first_name,
            last_name,
            appointment_date,
            date_code: None,
            confidence,
            name_outcome,
            review_reasons,
        }
    }

    /// Record built from reviewer-supplied values. Always HIGH.
    pub(crate) fn confirmed(
        first_name: &NonEmptyText,
        last_name: &NonEmptyText,
        appointment_date: Option<AppointmentDate>,
    ) -> Self {
        Self {
            raw_display_name: format!("{} {}", first_name, last_name),
            first_name: first_name.as_str().to_owned(),
            last_name: last_name.as_str().to_owned(),
            appointment_date,
            date_code: None,
            confidence: Confidence::High,
            name_outcome: None,
            review_reasons: Vec::new(),
        }
    }

    /// Attaches the DOI/DOB code read from the name line or supplied by a reviewer.
    pub(crate) fn with_date_code(self, date_code: Option<DateCode>) -> Self {
        Self { date_code, ..self }
    }

    /// Display name as found after the anchor, trailing ordinal removed.
    pub fn raw_display_name(&self) -> &str {
        &self.raw_display_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn appointment_date(&self) -> Option<AppointmentDate> {
        self.appointment_date
    }

    pub fn date_code(&self) -> Option<&DateCode> {
        self.date_code.as_ref()
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// `None` for reviewer-confirmed records and for documents without a name.
    pub fn name_outcome(&self) -> Option<NameOutcome> {
        self.name_outcome
    }

    pub fn review_reasons(&self) -> &[ReviewReason] {
        &self.review_reasons
    }

    pub fn needs_review(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

// Names and dates are patient data; only the shape of the record is printed.
impl std::fmt::Debug for PatientInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientInfo")
            .field("has_first_name", &!self.first_name.is_empty())
            .field("has_last_name", &!self.last_name.is_empty())
            .field("has_appointment_date", &self.appointment_date.is_some())
            .field("has_date_code", &self.date_code.is_some())
            .field("confidence", &self.confidence)
            .field("name_outcome", &self.name_outcome)
            .field("review_reasons", &self.review_reasons)
            .finish()
    }
}

/// Replacement values supplied by a human reviewer.
#[derive(Clone)]
pub struct ReviewCorrection {
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    /// `<MonthName> <day>, <year>`; required when the format uses the appointment date.
    pub appointment_date: Option<String>,
    /// DOI/DOB code, e.g. `DOI:010125`; optional.
    pub date_code: Option<String>,
}

impl ReviewCorrection {
    pub fn new(
        first_name: NonEmptyText,
        last_name: NonEmptyText,
        appointment_date: Option<String>,
    ) -> Self {
        Self {
            first_name,
            last_name,
            appointment_date: appointment_date.filter(|d| !d.trim().is_empty()),
            date_code: None,
        }
    }

    pub fn with_date_code(self, date_code: Option<String>) -> Self {
        Self {
            date_code: date_code.filter(|c| !c.trim().is_empty()),
            ..self
        }
    }
}

impl std::fmt::Debug for ReviewCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewCorrection")
            .field("has_appointment_date", &self.appointment_date.is_some())
            .field("has_date_code", &self.date_code.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_record_is_high() {
        let info = PatientInfo::confirmed(
            &NonEmptyText::new("Anna").unwrap(),
            &NonEmptyText::new("Nogales Ramirez").unwrap(),
            Some(AppointmentDate::new(2025, 12, 18).unwrap()),
        );
        assert!(!info.needs_review());
        assert_eq!(info.first_name(), "Anna");
        assert_eq!(info.last_name(), "Nogales Ramirez");
        assert!(info.review_reasons().is_empty());
    }

    #[test]
    fn test_needs_review_follows_confidence() {
        let info = PatientInfo::analysed(
            "Test Patient".into(),
            "Test".into(),
            "Patient".into(),
            None,
            Some(NameOutcome::Fallback),
            Confidence::Low,
            vec![ReviewReason::AmbiguousName],
        );
        assert!(info.needs_review());
    }

    #[test]
    fn test_debug_redacts_patient_data() {
        let info = PatientInfo::confirmed(
            &NonEmptyText::new("Anna").unwrap(),
            &NonEmptyText::new("Nogales").unwrap(),
            Some(AppointmentDate::new(2025, 12, 18).unwrap()),
        );
        let info = info.with_date_code(DateCode::parse("DOB031590"));
        assert!(info.date_code().is_some());
        let debug = format!("{:?}", info);
        assert!(!debug.contains("031590"));
        assert!(!debug.contains("Anna"));
        assert!(!debug.contains("Nogales"));
        assert!(!debug.contains("2025"));

        let correction = ReviewCorrection::new(
            NonEmptyText::new("Anna").unwrap(),
            NonEmptyText::new("Nogales").unwrap(),
            Some("December 18, 2025".into()),
        );
        assert!(!format!("{:?}", correction).contains("Anna"));
    }

    #[test]
    fn test_correction_blank_date_is_none() {
        let correction = ReviewCorrection::new(
            NonEmptyText::new("Anna").unwrap(),
            NonEmptyText::new("Nogales").unwrap(),
            Some("  ".into()),
        );
        assert!(correction.appointment_date.is_none());
    }
}
