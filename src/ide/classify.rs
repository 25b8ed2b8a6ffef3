//! Position-context classification.
//!
//! Every navigation query starts here: the cursor position is classified
//! into exactly one context, and the caller routes to the resolver that
//! can answer it.

use std::sync::LazyLock;

use regex::Regex;
use smol_str::SmolStr;

use crate::base::{FileId, Position, Span, text};
use crate::resolver::LibraryIndex;

/// What the cursor is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionContext {
    /// `receiver.word(` with a known receiver type: the library case.
    LibraryMethodCall {
        word: SmolStr,
        word_span: Span,
        receiver_name: SmolStr,
        receiver_type: SmolStr,
    },
    /// `receiver.word(` with an unknown receiver type, or `this.word(`.
    DirectMethodCall {
        word: SmolStr,
        word_span: Span,
        receiver: SmolStr,
    },
    /// Inside the quoted path of an `import` statement.
    ImportPath { word: SmolStr, path: SmolStr },
    /// The word is (or follows) a built-in type keyword.
    TypeReference { word: SmolStr, word_span: Span },
    /// Anything else that is a word.
    Identifier { word: SmolStr, word_span: Span },
}

static RECEIVER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\.\s*$").unwrap());
static QUOTED_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).unwrap());

const TYPE_KEYWORDS: &[&str] = &["uint", "int", "bool", "address", "string", "bytes", "mapping"];

/// Built-in value types have no definition to navigate to.
pub(crate) fn is_builtin_type(name: &str) -> bool {
    is_type_keyword(name)
}

/// Is this token a built-in type keyword (including sized forms like
/// `uint256` and `bytes32`)?
fn is_type_keyword(token: &str) -> bool {
    if TYPE_KEYWORDS.contains(&token) {
        return true;
    }
    for prefix in ["uint", "int", "bytes"] {
        if let Some(rest) = token.strip_prefix(prefix) {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Classify the cursor position. Returns `None` when the position is off
/// the end of the document or not on a word.
///
/// The library index must already hold this file's entry so receiver
/// types can be inferred.
pub fn classify(
    content: &str,
    position: Position,
    file: FileId,
    index: &LibraryIndex,
) -> Option<PositionContext> {
    let line = content.lines().nth(position.line)?;
    let (word, start, end) = text::word_at(line, position.column)?;
    let word = SmolStr::new(word);
    let word_span = Span::from_coords(position.line, start, position.line, end);

    let chars: Vec<char> = line.chars().collect();
    let line_before: String = chars[..start].iter().collect();
    let line_after: String = chars[end..].iter().collect();

    // Method-call shape: `receiver.word(`.
    if let Some(captures) = RECEIVER_RE.captures(&line_before) {
        if line_after.trim_start().starts_with('(') {
            let receiver = SmolStr::new(&captures[1]);
            if receiver != "this" {
                if let Some(receiver_type) = index.infer_variable_type(&receiver, file, content) {
                    return Some(PositionContext::LibraryMethodCall {
                        word,
                        word_span,
                        receiver_name: receiver,
                        receiver_type,
                    });
                }
            }
            return Some(PositionContext::DirectMethodCall {
                word,
                word_span,
                receiver,
            });
        }
    }

    // Import path: `import "./Lib.sol";` with the cursor inside the string.
    if line.contains("import") && (line_before.contains('"') || line_before.contains('\'')) {
        let path = QUOTED_PATH_RE
            .captures(line)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| SmolStr::new(m.as_str()))
            .unwrap_or_else(|| word.clone());
        return Some(PositionContext::ImportPath { word, path });
    }

    // Type context: the word itself, or an earlier token on the line.
    let preceded_by_type = line_before
        .split(|c: char| !text::is_word_character(c))
        .any(is_type_keyword);
    if is_type_keyword(&word) || preceded_by_type {
        return Some(PositionContext::TypeReference { word, word_span });
    }

    Some(PositionContext::Identifier { word, word_span })
}
