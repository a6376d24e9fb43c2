//! Status label normalization.
//!
//! Labels are compatibility-decomposed (NFKD), stripped of every
//! non-ASCII code point (which removes the combining accents NFKD
//! splits off), trimmed and lowercased. "  Aprovádo " becomes "aprovado".

use unicode_normalization::UnicodeNormalization;

pub fn normalize_status(label: &str) -> String {
    let ascii: String = label.nfkd().filter(char::is_ascii).collect();
    ascii.trim().to_lowercase()
}
