//! Text utilities for working with source code at a cursor position.

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters, which
/// covers Solidity's `[A-Za-z0-9_$]` identifier set and then some.
#[inline]
pub fn is_word_character(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

/// Find the boundaries of the word at the given character position.
///
/// Returns `Some((start, end))` where `start` is the character index of the
/// word start and `end` is the character index after the last word
/// character, or `None` if there is no word at the position.
pub fn find_word_boundaries(chars: &[char], position: usize) -> Option<(usize, usize)> {
    if position >= chars.len() || !is_word_character(chars[position]) {
        return None;
    }

    let mut start = position;
    while start > 0 && is_word_character(chars[start - 1]) {
        start -= 1;
    }

    let mut end = position;
    while end < chars.len() && is_word_character(chars[end]) {
        end += 1;
    }

    Some((start, end))
}

/// Extract the word (identifier) at the cursor position in a line of text.
///
/// Returns the word together with its `(start, end)` character range, or
/// `None` if the cursor is not on a word character.
pub fn word_at(line: &str, position: usize) -> Option<(String, usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let (start, end) = find_word_boundaries(&chars, position)?;
    Some((chars[start..end].iter().collect(), start, end))
}
