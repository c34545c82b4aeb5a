use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[ARTIFACT:(MAP|TABLE|REPORT):[^\]]+\]").unwrap());

/// Strip artifact markers and surrounding whitespace from generated text.
///
/// Removal repeats until no marker remains, since deleting an inner marker
/// can join the pieces of an outer one.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.to_string();
    while let Cow::Owned(stripped) = MARKER.replace_all(&text, "") {
        text = stripped;
    }
    text.trim().to_string()
}
