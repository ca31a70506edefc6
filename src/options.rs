//! Emission options and the configuration file that carries them.
//!
//! Defaults mirror the command line: root `Model`, source field order,
//! immutable `let` fields, two-space indent, `internal` access, `Codable`
//! conformance, camel-case names for both fields and nested types.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inference::ValueOptions;
use crate::naming::{IdentifierEscaper, ObjectNameStrategy, VariableNameStrategy};
use crate::path_de;

// ------------------------------- Indentation ------------------------------ //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentUnit {
    Spaces(usize),
    Tab,
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentUnit::Spaces(2)
    }
}

impl IndentUnit {
    /// Text for one nesting level.
    pub fn unit(&self) -> String {
        match self {
            IndentUnit::Spaces(width) => " ".repeat(*width),
            IndentUnit::Tab => "\t".to_string(),
        }
    }
}

impl FromStr for IndentUnit {
    type Err = String;

    /// `tab` or a space count, e.g. `4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tab" | "\t" => Ok(IndentUnit::Tab),
            n => n
                .parse::<usize>()
                .map(IndentUnit::Spaces)
                .map_err(|_| format!("expected `tab` or a number of spaces, got `{s}`")),
        }
    }
}

impl fmt::Display for IndentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentUnit::Spaces(width) => write!(f, "{width}"),
            IndentUnit::Tab => f.write_str("tab"),
        }
    }
}

// ------------------------------ Access level ------------------------------ //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    #[default]
    Internal,
    Fileprivate,
}

impl AccessLevel {
    pub fn keyword(self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Internal => "internal",
            AccessLevel::Fileprivate => "fileprivate",
        }
    }
}

// ------------------------------ Emit options ------------------------------ //

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitOptions {
    /// Name declared for the root type.
    pub root_name: String,
    /// Emit fields ordered by source key instead of source order.
    pub sorted_fields: bool,
    /// `var` instead of `let`.
    pub mutable: bool,
    pub indent_unit: IndentUnit,
    pub access_level: AccessLevel,
    /// Emit the key-mapping table even when every identifier equals its key.
    pub always_emit_key_mapping: bool,
    /// Appended (deduplicated, sorted) to every declaration.
    pub conforming_interfaces: Vec<String>,
    pub variable_name_strategy: VariableNameStrategy,
    pub object_name_strategy: ObjectNameStrategy,
    /// Singularize nested type names of array fields (`items` → `Item`).
    pub drop_plural_suffix: bool,
    pub escaper: IdentifierEscaper,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            root_name: crate::ir::DEFAULT_ROOT_NAME.to_string(),
            sorted_fields: false,
            mutable: false,
            indent_unit: IndentUnit::default(),
            access_level: AccessLevel::default(),
            always_emit_key_mapping: false,
            conforming_interfaces: vec!["Codable".to_string()],
            variable_name_strategy: VariableNameStrategy::default(),
            object_name_strategy: ObjectNameStrategy::default(),
            drop_plural_suffix: false,
            escaper: IdentifierEscaper::default(),
        }
    }
}

impl EmitOptions {
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.root_name) {
            return Err(Error::InvalidOptions {
                option: "root_name",
                message: format!("`{}` is not an identifier", self.root_name),
            });
        }
        if self.escaper.reserved.contains(&self.root_name) {
            return Err(Error::InvalidOptions {
                option: "root_name",
                message: format!("`{}` is a reserved word", self.root_name),
            });
        }
        if let Some(bad) = self
            .conforming_interfaces
            .iter()
            .find(|name| !name.split('.').all(is_identifier))
        {
            return Err(Error::InvalidOptions {
                option: "conforming_interfaces",
                message: format!("`{bad}` is not a type name"),
            });
        }
        if self.indent_unit == IndentUnit::Spaces(0) {
            return Err(Error::InvalidOptions {
                option: "indent_unit",
                message: "indentation needs at least one space".to_string(),
            });
        }
        Ok(())
    }

    /// Conformance list as written: deduplicated and sorted.
    pub fn interfaces(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.conforming_interfaces.iter().map(String::as_str).collect();
        set.into_iter().collect()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ------------------------------ Config file ------------------------------- //

/// Everything a run can be configured with, as read from a JSON file.
///
/// ```json
/// { "emit": { "root_name": "User", "indent_unit": "tab" },
///   "value": { "detect_uuid": false } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emit: EmitOptions,
    pub value: ValueOptions,
    pub schema: crate::schema::SchemaOptions,
}

impl Config {
    pub fn from_json_str(src: &str) -> Result<Self> {
        let config: Config = path_de::from_str_with_path(src)?;
        config.emit.validate()?;
        Ok(config)
    }
}

// ------------------------------- Tests ------------------------------------ //
