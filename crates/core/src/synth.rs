//! Filename synthesizer.
//!
//! `<last>, <first> <MMDDYY> <suffix>.pdf`, with the date taken from today or from the record
//! according to the output format. A DOI/DOB code, when present, goes in front of the date:
//! `<last>, <first> <code> <MMDDYY> <suffix>.pdf`.

use crate::constants::DOCUMENT_EXTENSION;
use crate::dates::AppointmentDate;
use crate::format::{DateSource, OutputFormat};
use crate::patient::PatientInfo;
use crate::validation::sanitize_filename;
use chrono::NaiveDate;

/// A record reached the synthesizer in a state the scorer should have ruled out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("record is pending review")]
    ReviewPending,
    #[error("format {format} needs an appointment date but the record has none")]
    MissingAppointmentDate { format: OutputFormat },
}

/// Builds the destination filename for a resolved record.
///
/// # Errors
///
/// Returns `SynthesisError` if the record still needs review, or if the format uses the
/// appointment date and the record has none. There is no fallback to today's date.
pub fn synthesize_filename(
    info: &PatientInfo,
    format: OutputFormat,
    today: NaiveDate,
) -> Result<String, SynthesisError> {
    if info.needs_review() {
        tracing::error!(label = "SynthesisInvariantViolation", "review-pending record reached synthesis");
        return Err(SynthesisError::ReviewPending);
    }

    let date = match format.date_source() {
        DateSource::Today => AppointmentDate::from_naive(today),
        DateSource::Appointment => info.appointment_date().ok_or_else(|| {
            tracing::error!(
                label = "SynthesisInvariantViolation",
                format = format.id(),
                "high-confidence record has no appointment date"
            );
            SynthesisError::MissingAppointmentDate { format }
        })?,
    };

    let date_part = match info.date_code() {
        Some(code) => format!("{} {}", code.as_str(), date.mmddyy()),
        None => date.mmddyy(),
    };

    let filename = format!(
        "{}, {} {} {}.{}",
        info.last_name(),
        info.first_name(),
        date_part,
        format.suffix(),
        DOCUMENT_EXTENSION
    );

    Ok(sanitize_filename(&filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::{Confidence, ReviewReason};
    use crate::locator::DateCode;
    use crate::names::NameOutcome;
    use chartname_types::NonEmptyText;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn confirmed(first: &str, last: &str, date: Option<AppointmentDate>) -> PatientInfo {
        PatientInfo::confirmed(
            &NonEmptyText::new(first).unwrap(),
            &NonEmptyText::new(last).unwrap(),
            date,
        )
    }

    fn dec_18() -> Option<AppointmentDate> {
        Some(AppointmentDate::new(2025, 12, 18).unwrap())
    }

    #[test]
    fn test_reference_filename() {
        let info = confirmed("Test", "Patient", dec_18());
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()).unwrap(),
            "Patient, Test 121825 PT Note.pdf"
        );
    }

    #[test]
    fn test_every_appointment_format() {
        let info = confirmed("Test", "Patient", dec_18());
        let cases = [
            (OutputFormat::ApptBillingEval, "Patient, Test 121825 PT Eval Note.pdf"),
            (OutputFormat::ApptBillingProgress, "Patient, Test 121825 PT Progress Note.pdf"),
            (OutputFormat::ApptBillingDischarge, "Patient, Test 121825 PT Discharge Note.pdf"),
        ];
        for (format, expected) in cases {
            assert_eq!(synthesize_filename(&info, format, today()).unwrap(), expected);
        }
    }

    #[test]
    fn test_current_discharge_uses_today() {
        let info = confirmed("Test", "Patient", dec_18());
        assert_eq!(
            synthesize_filename(&info, OutputFormat::CurrentDischarge, today()).unwrap(),
            "Patient, Test 101826 PT Chart Note.pdf"
        );
    }

    #[test]
    fn test_current_discharge_without_appointment_date() {
        let info = confirmed("Test", "Patient", None);
        assert!(synthesize_filename(&info, OutputFormat::CurrentDischarge, today()).is_ok());
    }

    #[test]
    fn test_multi_word_names_verbatim() {
        let info = confirmed("Anna", "Nogales Ramirez", dec_18());
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()).unwrap(),
            "Nogales Ramirez, Anna 121825 PT Note.pdf"
        );
    }

    #[test]
    fn test_date_code_goes_before_appointment_date() {
        let info = confirmed("Test", "Patient 1", dec_18()).with_date_code(DateCode::parse("DOI010125"));
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()).unwrap(),
            "Patient 1, Test DOI010125 121825 PT Note.pdf"
        );

        let info = confirmed("Jane", "Doe 2", dec_18()).with_date_code(DateCode::parse("DOB031590"));
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBillingEval, today()).unwrap(),
            "Doe 2, Jane DOB031590 121825 PT Eval Note.pdf"
        );
    }

    #[test]
    fn test_date_code_with_current_discharge_uses_today() {
        let info = confirmed("Test", "Patient 1", None).with_date_code(DateCode::parse("DOI010125"));
        assert_eq!(
            synthesize_filename(&info, OutputFormat::CurrentDischarge, today()).unwrap(),
            "Patient 1, Test DOI010125 101826 PT Chart Note.pdf"
        );
    }

    #[test]
    fn test_date_code_does_not_replace_missing_appointment_date() {
        let info = confirmed("Test", "Patient 1", None).with_date_code(DateCode::parse("DOI010125"));
        assert!(matches!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()),
            Err(SynthesisError::MissingAppointmentDate { .. })
        ));
    }

    #[test]
    fn test_missing_date_fails_instead_of_defaulting() {
        let info = confirmed("Test", "Patient", None);
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()),
            Err(SynthesisError::MissingAppointmentDate {
                format: OutputFormat::ApptBilling
            })
        );
    }

    #[test]
    fn test_review_pending_is_rejected() {
        let info = PatientInfo::analysed(
            "Test Patient".into(),
            "Test".into(),
            "Patient".into(),
            dec_18(),
            Some(NameOutcome::Fallback),
            Confidence::Low,
            vec![ReviewReason::AmbiguousName],
        );
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()),
            Err(SynthesisError::ReviewPending)
        );
    }

    #[test]
    fn test_path_separators_removed() {
        let info = confirmed("A/B", "C\\D", dec_18());
        assert_eq!(
            synthesize_filename(&info, OutputFormat::ApptBilling, today()).unwrap(),
            "CD, AB 121825 PT Note.pdf"
        );
    }

    #[test]
    fn test_error_messages_carry_no_patient_data() {
        let err = SynthesisError::MissingAppointmentDate {
            format: OutputFormat::ApptBilling,
        };
        assert_eq!(
            err.to_string(),
            "format appt_billing needs an appointment date but the record has none"
        );
    }
}
