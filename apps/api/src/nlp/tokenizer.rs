//! Word-level tokenizer shared by the NLP pipeline and the skill gazetteer.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Words may carry internal joiners ("Node.js", "don't") and a trailing run
    // of + or # ("C++", "C#"). A slash always splits: "Python/SQL" is two words.
    static ref TOKEN_RE: Regex =
        Regex::new(r"[\p{L}\p{N}]+(?:[._'’&-][\p{L}\p{N}]+)*[+#]*|\S").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punct,
}

/// A token borrowed from the source text, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

impl Token<'_> {
    pub fn is_punct(&self) -> bool {
        self.kind == TokenKind::Punct
    }

    /// `Jane`, `Doe` (but not `JANE` or `jane`).
    pub fn is_title_case(&self) -> bool {
        let mut chars = self.text.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => {
                let rest: Vec<char> = chars.collect();
                !rest.is_empty() && rest.iter().all(|c| c.is_alphabetic() && c.is_lowercase())
            }
            _ => false,
        }
    }

    /// `JANE`, `DOE`. Single letters do not count.
    pub fn is_upper_word(&self) -> bool {
        self.text.chars().count() > 1 && self.text.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
    }
}

/// Splits text into word and punctuation tokens in document order.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| {
            let kind = if m.as_str().chars().any(char::is_alphanumeric) {
                TokenKind::Word
            } else {
                TokenKind::Punct
            };
            Token {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
                kind,
            }
        })
        .collect()
}
