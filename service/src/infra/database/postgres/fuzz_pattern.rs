//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// `SIMILAR TO` pattern for fuzzy matching deal names, built out of a raw
/// search input.
///
/// Every whitespace-separated word of the input becomes a `%word%`
/// alternative, with `SIMILAR TO` metacharacters escaped.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Builds a [`FuzzPattern`] out of the provided search `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "({})",
            input.split_ascii_whitespace().format_with("|", |word, f| {
                f(&format_args!(
                    "%{}%",
                    word.replace('\\', r"\\")
                        .replace('%', r"\%")
                        .replace('|', r"\|")
                        .replace('*', r"\*")
                        .replace('+', r"\+")
                        .replace('?', r"\?")
                        .replace('{', r"\{")
                        .replace('}', r"\}")
                        .replace('(', r"\(")
                        .replace(')', r"\)")
                        .replace('[', r"\[")
                        .replace(']', r"\]")
                        .replace('_', r"\_")
                ))
            }),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn splits_words_into_alternatives() {
        assert_eq!(
            FuzzPattern::new("main street").to_string(),
            "(%main%|%street%)",
        );
    }

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(
            FuzzPattern::new("50%_off").to_string(),
            r"(%50\%\_off%)",
        );
    }
}
