//! DNS-1123 label sanitization for resource names and selector values.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a DNS-1123 label.
pub const DNS1123_LABEL_MAX_LEN: usize = 63;

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern is valid"));

static DNS1123_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("static pattern is valid")
});

/// Convert a display name into a DNS-1123 label.
///
/// Lower-cases the input, replaces every run of characters other than
/// `[a-z0-9]` (hyphens included) with a single hyphen, then strips leading
/// and trailing hyphens. Total and idempotent.
///
/// A name without any ASCII alphanumerics sanitizes to the empty string.
/// The result is not truncated to [`DNS1123_LABEL_MAX_LEN`] and is not
/// unique across services.
pub fn sanitize(display_name: &str) -> String {
    let lowered = display_name.to_lowercase();
    DISALLOWED_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_owned()
}

/// True if `name` is a valid DNS-1123 label.
pub fn is_dns1123_label(name: &str) -> bool {
    name.len() <= DNS1123_LABEL_MAX_LEN && DNS1123_LABEL.is_match(name)
}
