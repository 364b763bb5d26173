//! Output filename formats.
//!
//! Each format fixes where the filename date comes from and the literal suffix appended
//! after it. The set is closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the `MMDDYY` part of a filename comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// The date the document is processed.
    Today,
    /// The appointment date read from the document.
    Appointment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    CurrentDischarge,
    #[default]
    ApptBilling,
    ApptBillingEval,
    ApptBillingProgress,
    ApptBillingDischarge,
}

/// Returned when a format identifier is not one of [`OutputFormat::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}'")]
pub struct UnknownFormat(pub String);

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::CurrentDischarge,
        OutputFormat::ApptBilling,
        OutputFormat::ApptBillingEval,
        OutputFormat::ApptBillingProgress,
        OutputFormat::ApptBillingDischarge,
    ];

    /// Stable identifier used in config files, environment values and CLI flags.
    pub fn id(&self) -> &'static str {
        match self {
            OutputFormat::CurrentDischarge => "current_discharge",
            OutputFormat::ApptBilling => "appt_billing",
            OutputFormat::ApptBillingEval => "appt_billing_eval",
            OutputFormat::ApptBillingProgress => "appt_billing_progress",
            OutputFormat::ApptBillingDischarge => "appt_billing_discharge",
        }
    }

    pub fn date_source(&self) -> DateSource {
        match self {
            OutputFormat::CurrentDischarge => DateSource::Today,
            _ => DateSource::Appointment,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            OutputFormat::CurrentDischarge => "PT Chart Note",
            OutputFormat::ApptBilling => "PT Note",
            OutputFormat::ApptBillingEval => "PT Eval Note",
            OutputFormat::ApptBillingProgress => "PT Progress Note",
            OutputFormat::ApptBillingDischarge => "PT Discharge Note",
        }
    }

    pub fn requires_appointment_date(&self) -> bool {
        self.date_source() == DateSource::Appointment
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownFormat(wanted.to_owned()))
    }
}
