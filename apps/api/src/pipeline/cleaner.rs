//! Normalises raw extracted text before it reaches the NLP pipeline.

/// Private-use code points that PDF glyph extraction leaves behind (icon fonts,
/// ligature placeholders).
const PRIVATE_USE: std::ops::RangeInclusive<char> = '\u{F000}'..='\u{F8FF}';

/// Cleans raw text: drops private-use glyphs, collapses whitespace runs to a
/// single space and trims the ends.
///
/// Returns `None` when nothing but whitespace survives; such documents are
/// excluded from the active corpus.
pub fn clean(raw_text: &str) -> Option<String> {
    let mut cleaned = String::with_capacity(raw_text.len());
    let mut pending_space = false;

    for c in raw_text.chars().filter(|c| !PRIVATE_USE.contains(c)) {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(c);
    }

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
