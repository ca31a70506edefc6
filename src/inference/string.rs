use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::BaseType;

/// Canonical textual UUID: 8-4-4-4-12 hex digits, either case.
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$")
        .expect("UUID pattern is valid")
});

pub fn looks_like_uuid(s: &str) -> bool {
    UUID_RE.is_match(s)
}

pub fn classify_str(s: &str, detect_uuid: bool) -> BaseType {
    if detect_uuid && looks_like_uuid(s) {
        BaseType::Uuid
    } else {
        BaseType::String
    }
}
