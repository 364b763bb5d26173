//! Name resolver.
//!
//! Splits a multi-word display name into first and last name. Position alone cannot tell
//! "Tony Chan | Nguyen" from "Anna | Nogales Ramirez", so the split is driven by an independent
//! signal: the two-letter initials token the exporting system puts in the source filename.
//!
//! The search is an ordered scan over the n-1 contiguous two-part splits, leftmost first,
//! returning the first split whose head and tail start with the first and second initial.
//! Without initials, or without a matching split, the last word becomes the surname.

use crate::constants::INITIALS_SEPARATORS;
use std::path::Path;

/// How a name was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOutcome {
    /// A split matched the filename initials.
    InitialsMatched,
    /// Last word taken as surname without confirmation.
    Fallback,
    /// One word only; used as the surname, first name left empty.
    SingleWord,
}

/// Two-letter initials read from a source filename (first-name initial, last-name initial).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Initials {
    first: char,
    last: char,
}

impl Initials {
    /// Builds initials from two uppercase letters.
    pub fn new(first: char, last: char) -> Option<Self> {
        let valid = |c: char| c.is_alphabetic() && c.is_uppercase();
        (valid(first) && valid(last)).then_some(Self { first, last })
    }

    /// Finds the first separator-delimited segment of `filename` that is exactly two
    /// uppercase letters. The extension is ignored. Absence is not an error.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let stem = Path::new(filename).file_stem()?.to_str()?;

        stem.split(INITIALS_SEPARATORS).find_map(|segment| {
            let mut chars = segment.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(first), Some(last), None) => Self::new(first, last),
                _ => None,
            }
        })
    }

    pub fn first(&self) -> char {
        self.first
    }

    pub fn last(&self) -> char {
        self.last
    }
}

/// One trial split of the display name's words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub first_name: String,
    pub last_name: String,
}

impl NameCandidate {
    fn matches(&self, initials: Initials) -> bool {
        starts_with_letter(&self.first_name, initials.first())
            && starts_with_letter(&self.last_name, initials.last())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub first_name: String,
    pub last_name: String,
    pub outcome: NameOutcome,
}

impl std::fmt::Debug for ResolvedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedName")
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Every contiguous two-part split of `words`, split point moving left to right.
pub fn candidates<'a>(words: &'a [&'a str]) -> impl Iterator<Item = NameCandidate> + 'a {
    (1..words.len()).map(move |split| NameCandidate {
        first_name: words[..split].join(" "),
        last_name: words[split..].join(" "),
    })
}

/// Splits `display_name` into first and last name.
///
/// Returns `None` only when the name has no words at all.
pub fn resolve_name(display_name: &str, initials: Option<Initials>) -> Option<ResolvedName> {
    let words: Vec<&str> = display_name.split_whitespace().collect();

    match words.as_slice() {
        [] => None,
        [only] => Some(ResolvedName {
            first_name: String::new(),
            last_name: (*only).to_owned(),
            outcome: NameOutcome::SingleWord,
        }),
        [head @ .., last] => {
            if let Some(initials) = initials {
                if let Some(candidate) = candidates(&words).find(|c| c.matches(initials)) {
                    return Some(ResolvedName {
                        first_name: candidate.first_name,
                        last_name: candidate.last_name,
                        outcome: NameOutcome::InitialsMatched,
                    });
                }
                tracing::debug!("initials did not match any split, using last-word rule");
            }

            Some(ResolvedName {
                first_name: head.join(" "),
                last_name: (*last).to_owned(),
                outcome: NameOutcome::Fallback,
            })
        }
    }
}

/// Case-insensitive comparison of the first letter of `word` with `letter`.
fn starts_with_letter(word: &str, letter: char) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.to_lowercase().eq(letter.to_lowercase()))
}
