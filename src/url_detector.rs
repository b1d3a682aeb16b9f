//! Deterministic URL and email classification of single tokens.
//!
//! Unlike free-text pattern scanning, the detector classifies a whole token
//! at once: the token either is a URL/email or it is not. Misclassifications
//! are silent by design; the caller treats a miss as "no address here".

use once_cell::sync::Lazy;
use regex::Regex;

/// Kind of web address recognized in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// A URL, with or without an explicit scheme.
    Url,
    /// An email address.
    Email,
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    // Single-letter top-level domains are accepted; mail hosts in running
    // text are frequently abbreviated.
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+$").expect("valid regex")
});

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.-]*://\S+$").expect("valid regex"));

static URL_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^
        (?: www\. [-a-z0-9.]+
          | [-a-z0-9]+ (?: \. [-a-z0-9]+ )*
            \. (?: com|org|net|edu|gov|int|mil|info|biz|name|aero|coop|museum
                 | eu|cz|sk|de|at|pl|uk|fr|it|es|nl|be|ch|se|no|dk|fi|ru|us|ca )
        )
        (?: [/:?\#] \S* )? $",
    )
    .expect("valid regex")
});

/// Classify a single token as URL, email, or neither.
#[must_use]
pub fn detect(token: &str) -> Option<UrlKind> {
    if EMAIL.is_match(token) {
        Some(UrlKind::Email)
    } else if URL_SCHEME.is_match(token) || URL_HOST.is_match(token) {
        Some(UrlKind::Url)
    } else {
        None
    }
}
