//! The `"<key> --> <label>"` protocol used by reply keyboards.
//!
//! Keyboard buttons send their label back verbatim, so a row like
//! `"es --> Español"` or `"/delete <token> --> report.pdf"` comes back as the
//! user's text and has to be reduced to its key.

pub const ARROW: &str = "-->";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowSplit<'a> {
    Pair { key: &'a str, label: &'a str },
    NoSeparator(&'a str),
}

impl<'a> ArrowSplit<'a> {
    /// Left side of the arrow, or the whole trimmed text when there is none.
    pub fn key(&self) -> &'a str {
        match *self {
            ArrowSplit::Pair { key, .. } => key,
            ArrowSplit::NoSeparator(whole) => whole,
        }
    }

    pub fn label(&self) -> Option<&'a str> {
        match *self {
            ArrowSplit::Pair { label, .. } => Some(label),
            ArrowSplit::NoSeparator(_) => None,
        }
    }
}

/// Split on the first `-->`, trimming both sides.
pub fn split_arrow(text: &str) -> ArrowSplit<'_> {
    match text.split_once(ARROW) {
        Some((key, label)) => ArrowSplit::Pair {
            key: key.trim(),
            label: label.trim(),
        },
        None => ArrowSplit::NoSeparator(text.trim()),
    }
}

pub fn arrow_row(key: &str, label: &str) -> String {
    format!("{key} {ARROW} {label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_arrow_and_trims() {
        let s = split_arrow("  es -->  Español ");
        assert_eq!(
            s,
            ArrowSplit::Pair {
                key: "es",
                label: "Español"
            }
        );
        assert_eq!(s.key(), "es");

        let s = split_arrow("abc --> a --> b.txt");
        assert_eq!(s.key(), "abc");
        assert_eq!(s.label(), Some("a --> b.txt"));
    }

    #[test]
    fn missing_separator_falls_back_to_whole_string() {
        let s = split_arrow("  BQACAgIAAxkBAAI  ");
        assert_eq!(s, ArrowSplit::NoSeparator("BQACAgIAAxkBAAI"));
        assert_eq!(s.key(), "BQACAgIAAxkBAAI");
        assert_eq!(s.label(), None);
    }

    #[test]
    fn empty_left_side_is_kept_empty() {
        assert_eq!(split_arrow("--> English").key(), "");
        assert_eq!(split_arrow("").key(), "");
    }

    #[test]
    fn rows_round_trip_through_split() {
        let row = arrow_row("en", "English");
        assert_eq!(row, "en --> English");
        assert_eq!(split_arrow(&row).key(), "en");
    }
}
