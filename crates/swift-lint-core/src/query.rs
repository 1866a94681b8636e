//! Range queries over the token stream and file text.
//!
//! This is the only module that slices [`SourceFile::contents`] by byte range.
//! Callers pass and receive byte offsets; a range that cannot be mapped onto
//! the text (out of bounds or splitting a UTF-8 character) produces no
//! matches rather than a shifted location.

use regex::Regex;
use std::ops::Range;

use crate::syntax::{SourceFile, Token};

/// A regex match inside a byte range, together with the tokens it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMatch<'a> {
    /// Absolute byte range of the match.
    pub range: Range<usize>,
    /// Tokens whose byte ranges intersect the match, in stream order.
    pub tokens: &'a [Token],
}

/// Finds all non-overlapping matches of `pattern` inside `range` of the file.
///
/// Empty matches are skipped. Returns an empty vector when `range` does not
/// lie on character boundaries within the file.
#[must_use]
pub fn find_matches<'a>(
    file: &'a SourceFile,
    pattern: &Regex,
    range: Range<usize>,
) -> Vec<RangeMatch<'a>> {
    let Some(text) = file.contents().get(range.clone()) else {
        tracing::debug!(
            "dropping query over {:?} in {}: not a valid text range",
            range,
            file.path().display()
        );
        return Vec::new();
    };

    pattern
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| {
            let absolute = range.start + m.start()..range.start + m.end();
            RangeMatch {
                tokens: tokens_in(file.tokens(), absolute.clone()),
                range: absolute,
            }
        })
        .collect()
}

/// Returns the ordered slice of tokens that intersect `range`.
#[must_use]
pub fn tokens_in(tokens: &[Token], range: Range<usize>) -> &[Token] {
    let first = tokens.partition_point(|t| t.end() <= range.start);
    let last = first + tokens[first..].partition_point(|t| t.offset < range.end);
    &tokens[first..last]
}

/// Returns the last token whose offset is strictly less than `offset`.
#[must_use]
pub fn nearest_preceding_token(tokens: &[Token], offset: usize) -> Option<&Token> {
    let index = tokens.partition_point(|t| t.offset < offset);
    index.checked_sub(1).map(|i| &tokens[i])
}
