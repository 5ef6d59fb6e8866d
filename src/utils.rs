//! Text normalization helpers shared by the loaders.

use crate::constants::articles::YEAR_DIGITS;

/// Collapse runs of whitespace (including non-breaking spaces) into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Title-case a label: the first letter after any non-letter is upper-cased, the rest lower-cased.
///
/// `"cote d'ivoire"` becomes `"Cote D'Ivoire"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Return the first run of exactly four ASCII digits not adjacent to another digit.
pub fn find_year_token(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if !bytes[idx].is_ascii_digit() {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx - start == YEAR_DIGITS {
            return Some(&text[start..idx]);
        }
    }
    None
}

/// Strip thousands separators and all whitespace from a numeric cell.
pub fn strip_numeric_noise(raw: &str) -> String {
    raw.chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect()
}
