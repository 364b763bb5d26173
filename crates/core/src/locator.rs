//! Field locator.
//!
//! Isolates the patient display name, the optional DOI/DOB date code tagged onto it, and the
//! appointment-date substring from extracted text. Nothing here validates values; it only finds
//! them.

use crate::extractor::ExtractedText;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+([0-9]{1,2}),\s*([0-9]{4})\b",
    )
    .expect("date pattern is valid")
});

static TRAILING_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[0-9]+$").expect("ordinal pattern is valid"));

static DATE_CODE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(DOI|DOB)\s*:\s*([0-9]{6})\s*\)").expect("date code pattern is valid")
});

/// Date-of-injury or date-of-birth code, normalised to `DOI010125` / `DOB031590`.
///
/// A date of birth is patient data: the code is only ever written into the filename.
#[derive(Clone, PartialEq, Eq)]
pub struct DateCode(String);

impl DateCode {
    /// Reads a code written as `DOI:010125`, `(dob: 031590)` or `DOI010125`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Some(captures) = DATE_CODE_TAG.captures(trimmed) {
            return Some(Self::from_parts(&captures[1], &captures[2]));
        }

        let kind = trimmed.get(..3)?;
        let digits = trimmed.get(3..)?.trim_start_matches(':').trim();
        let known_kind = kind.eq_ignore_ascii_case("DOI") || kind.eq_ignore_ascii_case("DOB");
        let six_digits = digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit());
        (known_kind && six_digits).then(|| Self::from_parts(kind, digits))
    }

    fn from_parts(kind: &str, digits: &str) -> Self {
        Self(format!("{}{}", kind.to_ascii_uppercase(), digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for DateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DateCode(..)")
    }
}

/// Raw field candidates found in a document.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LocatedFields {
    /// Display name after the anchor. `None` if the anchor is missing or nothing follows it.
    pub display_name: Option<String>,
    /// DOI/DOB code tagged onto the display-name line.
    pub date_code: Option<DateCode>,
    /// First `<MonthName> <day>, <year>` substring in the text.
    pub date_text: Option<String>,
}

impl std::fmt::Debug for LocatedFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatedFields")
            .field("display_name_found", &self.display_name.is_some())
            .field("date_code_found", &self.date_code.is_some())
            .field("date_text_found", &self.date_text.is_some())
            .finish()
    }
}

pub fn locate_fields(text: &ExtractedText, anchor_marker: &str) -> LocatedFields {
    let (display_name, date_code) = match find_name_line(text, anchor_marker) {
        Some(line) => split_name_line(line),
        None => (None, None),
    };

    LocatedFields {
        display_name,
        date_code,
        date_text: find_date_text(text),
    }
}

/// Display name after the anchor, without its date code or trailing ordinal.
pub fn find_display_name(text: &ExtractedText, anchor_marker: &str) -> Option<String> {
    find_name_line(text, anchor_marker).and_then(|line| split_name_line(line).0)
}

/// The first non-blank line after the first line that is exactly `anchor_marker`.
fn find_name_line<'a>(text: &'a ExtractedText, anchor_marker: &str) -> Option<&'a str> {
    let mut lines = text.lines().skip_while(|line| line.trim() != anchor_marker);
    // Consume the anchor itself.
    lines.next()?;

    lines.map(str::trim).find(|line| !line.is_empty())
}

/// Separates a name line into display name and date code.
///
/// With a code, the number before it belongs to the name (`Test Patient 1 (DOI:010125)` keeps
/// `Test Patient 1`). Without one, a trailing ordinal is stripped.
fn split_name_line(line: &str) -> (Option<String>, Option<DateCode>) {
    let (name, date_code) = match DATE_CODE_TAG.captures(line) {
        Some(captures) => {
            let code = DateCode::from_parts(&captures[1], &captures[2]);
            let name = DATE_CODE_TAG
                .replace(line, " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            (name, Some(code))
        }
        None => (strip_trailing_ordinal(line), None),
    };

    let name = (!name.is_empty()).then_some(name);
    (name, date_code)
}

/// First date-shaped substring, scanning lines in order.
pub fn find_date_text(text: &ExtractedText) -> Option<String> {
    text.lines()
        .find_map(|line| DATE_PATTERN.find(line))
        .map(|m| m.as_str().to_owned())
}

/// Removes one trailing whitespace-separated digit group, e.g. `"Test Patient 1"` →
/// `"Test Patient"`. Digits attached to a word are kept.
pub fn strip_trailing_ordinal(name: &str) -> String {
    TRAILING_ORDINAL.replace(name.trim(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> ExtractedText {
        ExtractedText::from_raw(raw).unwrap()
    }

    #[test]
    fn test_locates_name_and_date() {
        let fields = locate_fields(
            &text("Clinic Header\nChart\nTest Patient 1\nAppointment\nDecember 18, 2025 at 9:00"),
            "Chart",
        );
        assert_eq!(fields.display_name.as_deref(), Some("Test Patient"));
        assert_eq!(fields.date_text.as_deref(), Some("December 18, 2025"));
    }

    #[test]
    fn test_skips_blank_lines_after_anchor() {
        let name = find_display_name(&text("Chart\n\n   \nMary Jane Watson 2"), "Chart");
        assert_eq!(name.as_deref(), Some("Mary Jane Watson"));
    }

    #[test]
    fn test_anchor_is_case_sensitive_whole_line() {
        assert_eq!(find_display_name(&text("chart\nTest Patient"), "Chart"), None);
        assert_eq!(find_display_name(&text("Chart Notes\nTest Patient"), "Chart"), None);
    }

    #[test]
    fn test_anchor_with_nothing_after() {
        assert_eq!(find_display_name(&text("Header\nChart\n\n"), "Chart"), None);
    }

    #[test]
    fn test_first_anchor_wins() {
        let name = find_display_name(&text("Chart\nAnna Nogales\nChart\nOther Person"), "Chart");
        assert_eq!(name.as_deref(), Some("Anna Nogales"));
    }

    #[test]
    fn test_first_date_wins() {
        let date = find_date_text(&text("Printed March 3, 2026\nDecember 18, 2025"));
        assert_eq!(date.as_deref(), Some("March 3, 2026"));
    }

    #[test]
    fn test_date_pattern_requires_comma_and_four_digit_year() {
        assert_eq!(find_date_text(&text("December 18 2025")), None);
        assert_eq!(find_date_text(&text("December 18, 25")), None);
        assert_eq!(find_date_text(&text("Dec 18, 2025")), None);
    }

    #[test]
    fn test_date_pattern_does_not_validate_day() {
        assert_eq!(
            find_date_text(&text("December 45, 2025")).as_deref(),
            Some("December 45, 2025")
        );
    }

    #[test]
    fn test_strip_trailing_ordinal() {
        assert_eq!(strip_trailing_ordinal("Test Patient 1"), "Test Patient");
        assert_eq!(strip_trailing_ordinal("Test Patient 12 3"), "Test Patient 12");
        assert_eq!(strip_trailing_ordinal("Test Patient"), "Test Patient");
        assert_eq!(strip_trailing_ordinal("R2 D2 Droid"), "R2 D2 Droid");
        assert_eq!(strip_trailing_ordinal("Agent 007x"), "Agent 007x");
    }

    #[test]
    fn test_strip_trailing_ordinal_leaves_plain_names_alone() {
        for name in ["Test Patient", "Anna Nogales Ramirez", "Jo 42x", "Solo"] {
            let once = strip_trailing_ordinal(name);
            assert_eq!(once, name);
            assert_eq!(strip_trailing_ordinal(&once), once, "changed {name}");
        }
    }

    #[test]
    fn test_date_code_split_from_name_keeps_number() {
        let fields = locate_fields(&text("Chart\nTest Patient 1 (DOI:010125)\nDecember 18, 2025"), "Chart");
        assert_eq!(fields.display_name.as_deref(), Some("Test Patient 1"));
        assert_eq!(fields.date_code.as_ref().map(DateCode::as_str), Some("DOI010125"));
        assert_eq!(fields.date_text.as_deref(), Some("December 18, 2025"));

        let fields = locate_fields(&text("Chart\nTest Patient 1 (DOB:031590)"), "Chart");
        assert_eq!(fields.date_code.as_ref().map(DateCode::as_str), Some("DOB031590"));
    }

    #[test]
    fn test_date_code_space_and_case() {
        for line in ["Test Patient 1 (DOI: 010125)", "Test Patient 1 (doi:010125)"] {
            let fields = locate_fields(&text(&format!("Chart\n{line}")), "Chart");
            assert_eq!(fields.display_name.as_deref(), Some("Test Patient 1"));
            assert_eq!(fields.date_code.as_ref().map(DateCode::as_str), Some("DOI010125"));
        }
    }

    #[test]
    fn test_no_date_code_strips_ordinal() {
        let fields = locate_fields(&text("Chart\nTest Patient 1\nDecember 18, 2025"), "Chart");
        assert_eq!(fields.display_name.as_deref(), Some("Test Patient"));
        assert_eq!(fields.date_code, None);
    }

    #[test]
    fn test_malformed_tag_is_not_a_date_code() {
        let fields = locate_fields(&text("Chart\nTest Patient (DOI:0101)"), "Chart");
        assert_eq!(fields.date_code, None);
    }

    #[test]
    fn test_date_code_parse() {
        assert_eq!(DateCode::parse("DOI:010125").unwrap().as_str(), "DOI010125");
        assert_eq!(DateCode::parse("(dob: 031590)").unwrap().as_str(), "DOB031590");
        assert_eq!(DateCode::parse("doi010125").unwrap().as_str(), "DOI010125");
        assert!(DateCode::parse("XYZ010125").is_none());
        assert!(DateCode::parse("DOI01012").is_none());
        assert!(DateCode::parse("").is_none());
        assert_eq!(format!("{:?}", DateCode::parse("DOB031590").unwrap()), "DateCode(..)");
    }

    #[test]
    fn test_debug_hides_values() {
        let fields = locate_fields(&text("Chart\nAnna Nogales Ramirez\nDecember 18, 2025"), "Chart");
        let debug = format!("{:?}", fields);
        assert!(!debug.contains("Anna"));
        assert!(!debug.contains("December"));
    }
}
