//! Source-key → identifier policies.
//!
//! Every strategy funnels through the same edge policy:
//! - characters that are neither alphanumeric nor `_` are stripped,
//! - an empty (or underscore-only) result becomes [`INVALID_KEY_FALLBACK`],
//! - a leading digit gets a `_` prefix.
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Identifier used when a key has nothing usable left after cleaning.
pub const INVALID_KEY_FALLBACK: &str = "fixInvalidJSONKey";

// ------------------------------ Strategies -------------------------------- //

/// How field (and enum case) identifiers are derived from source keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum VariableNameStrategy {
    /// Keep the key, minus symbol characters.
    Original,
    /// `long_path` → `longPath`
    #[default]
    CamelFromSnake,
}

/// How nested type names are derived from their field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectNameStrategy {
    /// `info` → `INFO`
    Uppercase,
    /// `long_path` → `LongPath`
    #[default]
    CamelFromSnake,
}

impl VariableNameStrategy {
    pub fn identifier(self, key: &str) -> String {
        let cleaned = strip_symbols(key);
        let transformed = match self {
            VariableNameStrategy::Original => cleaned,
            VariableNameStrategy::CamelFromSnake => convert_from_snake_case(&cleaned),
        };
        sanitize(transformed)
    }
}

impl ObjectNameStrategy {
    /// Type name for a nested declaration owned by the field `identifier`.
    ///
    /// A name identical to the field identifier is prefixed with `_` so the
    /// field and its type never shadow each other.
    pub fn type_name(self, identifier: &str) -> String {
        let name = match self {
            ObjectNameStrategy::Uppercase => identifier.to_uppercase(),
            ObjectNameStrategy::CamelFromSnake => upper_camel_from_snake(identifier),
        };
        let name = sanitize(strip_symbols(&name));
        if name == identifier { format!("_{name}") } else { name }
    }
}

/// Type name an inferencer gives a nested struct before any emit policy runs.
pub fn type_name_for_key(key: &str) -> String {
    upper_camel_from_snake(&VariableNameStrategy::Original.identifier(key))
}

/// Nested type name, optionally singularized when the field holds an array.
pub fn nested_type_name(
    strategy: ObjectNameStrategy,
    identifier: &str,
    is_array: bool,
    drop_plural_suffix: bool,
) -> String {
    let name = strategy.type_name(identifier);
    if is_array && drop_plural_suffix {
        singularize(name)
    } else {
        name
    }
}

// ------------------------------ Transforms -------------------------------- //

pub fn strip_symbols(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect()
}

/// Split on `_` and uppercase the first letter of every segment after the
/// first. Leading and trailing underscores survive untouched.
pub fn convert_from_snake_case(s: &str) -> String {
    let trimmed = s.trim_start_matches('_');
    let lead = s.len() - trimmed.len();
    let core = trimmed.trim_end_matches('_');
    let trail = trimmed.len() - core.len();
    if core.is_empty() {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..lead]);
    for (i, segment) in core.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(segment);
        } else {
            out.push_str(&upper_first(segment));
        }
    }
    out.push_str(&s[s.len() - trail..]);
    out
}

/// `long_path` → `LongPath`
pub fn upper_camel_from_snake(s: &str) -> String {
    let camel = convert_from_snake_case(s);
    let body = camel.trim_start_matches('_');
    let lead = camel.len() - body.len();
    format!("{}{}", &camel[..lead], upper_first(body))
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sanitize(s: String) -> String {
    if s.chars().all(|c| c == '_') {
        return INVALID_KEY_FALLBACK.to_string();
    }
    if s.starts_with(|c: char| c.is_numeric()) {
        return format!("_{s}");
    }
    s
}

fn singularize(name: String) -> String {
    if let Some(stem) = name.strip_suffix("ties") {
        return format!("{stem}ty");
    }
    let droppable = name
        .strip_suffix('s')
        .is_some_and(|stem| stem.chars().any(char::is_alphanumeric));
    let mut name = name;
    if droppable {
        name.pop();
    }
    name
}

// ------------------------------ Collisions -------------------------------- //

/// Make every name unique by appending `_` until it no longer clashes with an
/// earlier one. Earlier names keep their spelling.
pub fn resolve_collisions<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut used = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let mut name = name.into();
            while used.contains(&name) {
                name.push('_');
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

// ------------------------------- Escaping --------------------------------- //

const SWIFT_RESERVED: &[&str] = &[
    "Any", "Self", "as", "associatedtype", "await", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "let", "nil", "open", "operator", "precedencegroup", "private",
    "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct",
    "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias", "var",
    "where", "while", "Protocol", "Type",
];

/// Reserved-word table plus the quoting the target language uses to turn a
/// reserved word back into an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierEscaper {
    pub reserved: BTreeSet<String>,
    pub prefix: String,
    pub suffix: String,
}

impl Default for IdentifierEscaper {
    fn default() -> Self {
        Self::swift()
    }
}

impl IdentifierEscaper {
    /// Swift keywords, quoted with backticks.
    pub fn swift() -> Self {
        Self {
            reserved: SWIFT_RESERVED.iter().map(|s| s.to_string()).collect(),
            prefix: "`".into(),
            suffix: "`".into(),
        }
    }

    /// Escapes nothing.
    pub fn none() -> Self {
        Self { reserved: BTreeSet::new(), prefix: String::new(), suffix: String::new() }
    }

    pub fn with_reserved<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(words.into_iter().map(Into::into));
        self
    }

    /// Type names cannot be quoted, so a reserved one gets a `_` prefix.
    pub fn avoid_reserved(&self, type_name: String) -> String {
        if self.reserved.contains(&type_name) { format!("_{type_name}") } else { type_name }
    }

    pub fn escape<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        if self.reserved.contains(identifier) {
            Cow::Owned(format!("{}{identifier}{}", self.prefix, self.suffix))
        } else {
            Cow::Borrowed(identifier)
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("long_path", "longPath")]
    #[test_case("a__b_c", "aBC")]
    #[test_case("_private_key", "_privateKey")]
    #[test_case("trailing_", "trailing_")]
    #[test_case("alreadyCamel", "alreadyCamel")]
    #[test_case("___", "___")]
    fn snake_to_camel(input: &str, expected: &str) {
        assert_eq!(convert_from_snake_case(input), expected);
    }

    #[test]
    fn upper_camel_variant() {
        assert_eq!(upper_camel_from_snake("long_path"), "LongPath");
        assert_eq!(upper_camel_from_snake("_id"), "_Id");
    }

    #[test_case(VariableNameStrategy::Original, "user-name", "username")]
    #[test_case(VariableNameStrategy::Original, "$$$", INVALID_KEY_FALLBACK)]
    #[test_case(VariableNameStrategy::Original, "", INVALID_KEY_FALLBACK)]
    #[test_case(VariableNameStrategy::Original, "1st", "_1st")]
    #[test_case(VariableNameStrategy::CamelFromSnake, "9_lives", "_9Lives")]
    #[test_case(VariableNameStrategy::CamelFromSnake, "+-", INVALID_KEY_FALLBACK)]
    #[test_case(VariableNameStrategy::CamelFromSnake, "_", INVALID_KEY_FALLBACK)]
    #[test_case(VariableNameStrategy::CamelFromSnake, "created_at", "createdAt")]
    fn variable_identifiers(strategy: VariableNameStrategy, key: &str, expected: &str) {
        assert_eq!(strategy.identifier(key), expected);
    }

    #[test]
    fn type_names_avoid_shadowing_their_field() {
        assert_eq!(ObjectNameStrategy::CamelFromSnake.type_name("userInfo"), "UserInfo");
        assert_eq!(ObjectNameStrategy::CamelFromSnake.type_name("Data"), "_Data");
        assert_eq!(ObjectNameStrategy::Uppercase.type_name("data"), "DATA");
        assert_eq!(ObjectNameStrategy::Uppercase.type_name("ID"), "_ID");
    }

    #[test]
    fn plural_suffix_only_for_arrays() {
        let s = ObjectNameStrategy::CamelFromSnake;
        assert_eq!(nested_type_name(s, "cities", true, true), "City");
        assert_eq!(nested_type_name(s, "items", true, true), "Item");
        assert_eq!(nested_type_name(s, "items", false, true), "Items");
        assert_eq!(nested_type_name(s, "items", true, false), "Items");
    }

    #[test]
    fn collisions_get_underscore_suffixes() {
        let resolved = resolve_collisions(["userId", "userId", "id", "userId"]);
        assert_eq!(resolved, vec!["userId", "userId_", "id", "userId__"]);
    }

    #[test]
    fn case_distinct_keys_stay_distinct() {
        let s = VariableNameStrategy::CamelFromSnake;
        let resolved = resolve_collisions(["id", "Id"].map(|k| s.identifier(k)));
        assert_ne!(resolved[0], resolved[1]);
    }

    #[test]
    fn escaper_quotes_reserved_words_only() {
        let esc = IdentifierEscaper::swift();
        assert_eq!(esc.escape("default"), "`default`");
        assert_eq!(esc.escape("name"), "name");
        let custom = IdentifierEscaper::none().with_reserved(["type"]);
        assert_eq!(custom.escape("type"), "type");
        let rusty = IdentifierEscaper { prefix: "r#".into(), suffix: String::new(), ..custom };
        assert_eq!(rusty.escape("type"), "r#type");
    }

    #[test]
    fn reserved_type_names_are_prefixed() {
        let esc = IdentifierEscaper::swift();
        assert_eq!(esc.avoid_reserved("Self".into()), "_Self");
        assert_eq!(esc.avoid_reserved("Type".into()), "_Type");
        assert_eq!(esc.avoid_reserved("User".into()), "User");
        assert_eq!(IdentifierEscaper::none().avoid_reserved("Self".into()), "Self");
    }
}
