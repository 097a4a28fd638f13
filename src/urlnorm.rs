/*!
URL normalization / validation for linksentinel.

This module centralizes:
- Whitespace trimming and empty-input rejection
- Default-scheme prepending (`https://`) for bare hostnames
- Absolute-URL validation via the `url` crate

The returned string is the scheme-prefixed trimmed input, not the parser's
re-serialization: parsing acts purely as a gate, so the host keeps its case
and no trailing slash is introduced.
*/

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::{LinkSentinelError, Result};

/// Case-insensitive check for an explicit http(s) scheme prefix.
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("scheme regex is valid"));

/// Validate user input and normalize it into an absolute http(s) URL string.
///
/// Behavior:
/// - trims surrounding whitespace; empty afterwards -> `EmptyInput`
/// - prepends `https://` when no case-insensitive `http://`/`https://`
///   prefix is present
/// - rejects anything that does not parse as an absolute URL
///   (`MalformedUrl`)
///
/// Pure function, no side effects.
pub fn normalize(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LinkSentinelError::EmptyInput);
    }

    let formatted = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&formatted) {
        Ok(parsed) => {
            // A URL like "https://" parses relative checks but yields an
            // empty host; treat hostless results as malformed input.
            if parsed.host_str().map_or(true, str::is_empty) {
                return Err(LinkSentinelError::malformed_url(trimmed, "missing host"));
            }
            Ok(formatted)
        }
        Err(e) => Err(LinkSentinelError::malformed_url(trimmed, e.to_string())),
    }
}
