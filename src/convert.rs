//! Traditional-to-simplified Chinese script conversion.
//!
//! The source feed and the article pages it links to are published in
//! traditional characters; everything this service returns is simplified.
//! The conversion table ships inside `simplet2s` and is compiled into the
//! binary, so conversion cannot fail at runtime.

/// Convert traditional Chinese characters in `text` to their simplified
/// equivalents. Characters without a mapping (simplified text, Latin,
/// digits, punctuation) pass through unchanged.
pub fn to_simplified(text: &str) -> String {
    simplet2s::convert(text)
}
