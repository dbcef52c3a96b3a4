//! Text, phone and URL similarity primitives
//!
//! Every function here is total: malformed input degrades to a weaker
//! comparison instead of failing.

use strsim::normalized_levenshtein;
use url::Url;

/// Fewest digits a phone number may have after dropping a country code
const MIN_NATIONAL_DIGITS: usize = 10;

/// Longest country calling code
const MAX_COUNTRY_CODE_DIGITS: usize = 3;

/// Normalize text for comparison
///
/// - Converts to lowercase
/// - Trims surrounding whitespace
/// - Drops everything that is not alphanumeric or whitespace
///
/// Stripping runs last, so whitespace left next to removed punctuation at
/// either end is kept (`"Joe's Pizza !"` becomes `"joes pizza "`).
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Similarity between two strings after normalization
///
/// Returns exactly 1.0 for identical normalized strings, otherwise the
/// normalized Levenshtein similarity (1.0 identical, 0.0 unrelated).
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_text(a);
    let b = normalize_text(b);

    if a == b {
        return 1.0;
    }

    normalized_levenshtein(&a, &b)
}

/// Keep only the digits of a phone number
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check whether two phone numbers refer to the same line
///
/// Digit strings must be equal, or differ only by a leading country code on
/// a complete national number (`+1 555 123 4567` vs `555-123-4567`). A
/// number missing its area code never matches a longer one.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = normalize_phone(a);
    let b = normalize_phone(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }

    let (short, long) = if a.len() < b.len() { (&a, &b) } else { (&b, &a) };
    short.len() >= MIN_NATIONAL_DIGITS
        && long.len() - short.len() <= MAX_COUNTRY_CODE_DIGITS
        && long.ends_with(short.as_str())
}

/// Lowercased host of a website URL
///
/// Input that does not parse as an absolute URL with a host, including
/// scheme-less values such as `example.com/menu`, is compared as the raw
/// lowercased string.
pub fn normalize_host(website: &str) -> String {
    Url::parse(website)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| website.to_lowercase())
}
