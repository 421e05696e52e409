//! Name key extraction for first/last name sorting.
//!
//! Sorting by first or last name needs the matching token out of a free-form
//! display name such as "Mrs. Dennis Schulist" or "Nicholas Runolfsdottir V".
//! The [`NameParser`] trait is the seam for that; [`HumanNameParser`] is the
//! default implementation, following the usual conventions for titles,
//! generational/professional suffixes, "Last, First" ordering, and last-name
//! particles like "van" or "de".

/// Which part of a full name to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePart {
    First,
    Last,
}

/// Extracts a comparable name token from a full display name.
///
/// Implementations must be deterministic: the same input and part always
/// produce the same token. A part that cannot be found is returned as an
/// empty string.
pub trait NameParser: std::fmt::Debug {
    fn parse(&self, full_name: &str, part: NamePart) -> String;
}

/// Leading honorifics, compared lowercase without a trailing period.
const TITLES: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mx", "dr", "prof", "sir", "dame", "rev", "fr", "hon", "lady",
    "lord", "capt", "col", "gen", "sgt",
];

/// Trailing generational and professional suffixes.
const SUFFIXES: &[&str] = &[
    "jr", "sr", "ii", "iii", "iv", "v", "vi", "md", "phd", "dds", "dvm", "esq", "cpa", "rn",
];

/// Lowercase particles that belong to the last name ("Ludwig van Beethoven").
const PARTICLES: &[&str] = &[
    "van", "von", "de", "da", "di", "del", "della", "der", "den", "du", "la", "le", "dos",
    "das", "st", "ste", "bin", "ibn", "al",
];

/// Convention-based parser for human names.
///
/// # Examples
///
/// ```
/// use yellowpage::domain::names::{HumanNameParser, NameParser, NamePart};
///
/// let parser = HumanNameParser;
/// assert_eq!(parser.parse("Mrs. Dennis Schulist", NamePart::First), "Dennis");
/// assert_eq!(parser.parse("Nicholas Runolfsdottir V", NamePart::Last), "Runolfsdottir");
/// assert_eq!(parser.parse("Smith, John A.", NamePart::First), "John");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanNameParser;

impl NameParser for HumanNameParser {
    fn parse(&self, full_name: &str, part: NamePart) -> String {
        let parsed = ParsedName::from_full(full_name);
        match part {
            NamePart::First => parsed.first,
            NamePart::Last => parsed.last,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ParsedName {
    first: String,
    last: String,
}

impl ParsedName {
    fn from_full(full_name: &str) -> Self {
        let mut segments: Vec<&str> = full_name
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        // "John Smith, Jr." carries its suffix after the comma.
        while segments.len() > 1
            && segments
                .last()
                .is_some_and(|s| s.split_whitespace().all(|t| is_one_of(t, SUFFIXES)))
        {
            segments.pop();
        }

        match segments.as_slice() {
            [] => Self::default(),
            [single] => Self::from_natural_order(single),
            [last, given, ..] => {
                let given = strip_titles(given.split_whitespace().collect());
                Self {
                    first: given.first().map(|t| (*t).to_string()).unwrap_or_default(),
                    last: strip_titles(last.split_whitespace().collect()).join(" "),
                }
            }
        }
    }

    fn from_natural_order(name: &str) -> Self {
        let mut tokens = strip_titles(name.split_whitespace().collect());

        while tokens.len() > 2 && tokens.last().is_some_and(|t| is_one_of(t, SUFFIXES)) {
            tokens.pop();
        }

        match tokens.as_slice() {
            [] => Self::default(),
            [only] => Self {
                first: (*only).to_string(),
                last: String::new(),
            },
            _ => {
                let mut start = tokens.len() - 1;
                while start > 1 && is_one_of(tokens[start - 1], PARTICLES) {
                    start -= 1;
                }
                Self {
                    first: tokens[0].to_string(),
                    last: tokens[start..].join(" "),
                }
            }
        }
    }
}

fn strip_titles(mut tokens: Vec<&str>) -> Vec<&str> {
    while tokens.len() > 1 && is_one_of(tokens[0], TITLES) {
        tokens.remove(0);
    }
    tokens
}

fn is_one_of(token: &str, list: &[&str]) -> bool {
    let normalized = token.trim_end_matches('.').to_lowercase();
    list.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(name: &str) -> String {
        HumanNameParser.parse(name, NamePart::First)
    }

    fn last(name: &str) -> String {
        HumanNameParser.parse(name, NamePart::Last)
    }

    #[test]
    fn plain_two_part_names() {
        assert_eq!(first("Leanne Graham"), "Leanne");
        assert_eq!(last("Leanne Graham"), "Graham");
        assert_eq!(last("Clementina DuBuque"), "DuBuque");
    }

    #[test]
    fn middle_names_and_initials_are_skipped() {
        assert_eq!(first("John A. Smith"), "John");
        assert_eq!(last("John A. Smith"), "Smith");
    }

    #[test]
    fn titles_and_suffixes_are_ignored() {
        assert_eq!(first("Mrs. Dennis Schulist"), "Dennis");
        assert_eq!(last("Mrs. Dennis Schulist"), "Schulist");
        assert_eq!(last("Nicholas Runolfsdottir V"), "Runolfsdottir");
        assert_eq!(last("Martin Luther King, Jr."), "King");
        assert_eq!(first("Dr Jane Roe PhD"), "Jane");
    }

    #[test]
    fn particles_stay_with_the_last_name() {
        assert_eq!(last("Ludwig van Beethoven"), "van Beethoven");
        assert_eq!(first("Ludwig van Beethoven"), "Ludwig");
    }

    #[test]
    fn comma_separated_last_first() {
        assert_eq!(first("Smith, John A."), "John");
        assert_eq!(last("Smith, John A."), "Smith");
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(first(""), "");
        assert_eq!(last("   "), "");
        assert_eq!(first("Cher"), "Cher");
        assert_eq!(last("Cher"), "");
        assert_eq!(first("Dr."), "Dr.");
        assert_eq!(last("Anna V"), "V");
    }

    #[test]
    fn deterministic() {
        let name = "Sir Patrick de la Cruz III";
        assert_eq!(last(name), last(name));
        assert_eq!(last(name), "de la Cruz");
        assert_eq!(first(name), "Patrick");
    }
}
