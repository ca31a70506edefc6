//! JSON-Schema inference.
//!
//! Only the subset needed to describe plain records is understood: `type`,
//! `properties`, `required`, `items`, `enum`, and `minimum` /
//! `exclusiveMinimum` on integers. Anything else is an error, never coerced.
use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ir::{BaseType, FieldDef, FieldType, StructDef, TypeDef, DEFAULT_ROOT_NAME};
use crate::naming;

/// Type name forced for integers that cannot be negative.
pub const UNSIGNED_INTEGER_NAME: &str = "UInt";

const ROOT_PATH: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Emit [`UNSIGNED_INTEGER_NAME`] for integers with a non-negative lower bound.
    pub prefer_unsigned_integer: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self { prefer_unsigned_integer: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    options: SchemaOptions,
}

impl SchemaInferencer {
    pub fn new(options: SchemaOptions) -> Self {
        Self { options }
    }

    /// Infer the root declaration. The root must be `type: object`.
    pub fn infer(&self, root: &Value) -> Result<TypeDef> {
        if let Some(dialect) = root.get("$schema").and_then(Value::as_str) {
            tracing::debug!(dialect, "schema dialect");
        }
        let ty = schema_type(root, ROOT_PATH)?;
        if ty != "object" {
            return Err(Error::UnsupportedRootType { found: format!("schema type `{ty}`") });
        }
        let fields = self.infer_properties(root, ROOT_PATH)?;
        tracing::debug!(fields = fields.len(), "inferred root struct from schema");
        Ok(TypeDef::Struct(StructDef::new(DEFAULT_ROOT_NAME, fields)))
    }

    /// Infer the type of a single property schema declared under `key`.
    /// The result is never optional; that is decided by the owner's `required`.
    pub fn infer_node(&self, node: &Value, key: &str) -> Result<FieldType> {
        self.infer_at(node, key, &property_path(ROOT_PATH, key))
    }

    fn infer_at(&self, node: &Value, key: &str, path: &str) -> Result<FieldType> {
        let ty = schema_type(node, path)?;
        let field = match ty {
            "array" => {
                let items = node.get("items").ok_or_else(|| Error::missing("items", path))?;
                if !items.is_object() {
                    return Err(Error::invalid("items", path, "a single schema object"));
                }
                let element = self.infer_at(items, key, &format!("{path}/items"))?;
                FieldType::array_of(element.base)
            }
            "object" => {
                let fields = self.infer_properties(node, path)?;
                let nested = StructDef::new(naming::type_name_for_key(key), fields);
                FieldType::new(BaseType::Object(nested))
            }
            "integer" => {
                if self.options.prefer_unsigned_integer && has_non_negative_lower_bound(node) {
                    FieldType::new(BaseType::ForcedName(UNSIGNED_INTEGER_NAME.to_string()))
                } else {
                    FieldType::new(BaseType::Integer)
                }
            }
            "string" => FieldType::new(string_base(node, path)?),
            "boolean" => FieldType::new(BaseType::Boolean),
            other => {
                return Err(Error::UnsupportedSchemaType {
                    type_name: other.to_string(),
                    path: path.to_string(),
                });
            }
        };
        tracing::trace!(path, base = ?field.base, "schema node");
        Ok(field)
    }

    fn infer_properties(&self, node: &Value, path: &str) -> Result<Vec<FieldDef>> {
        let properties = node
            .get("properties")
            .ok_or_else(|| Error::missing("properties", path))?
            .as_object()
            .ok_or_else(|| Error::invalid("properties", path, "an object"))?;
        let required = required_keys(node, path)?;

        properties
            .iter()
            .map(|(key, schema)| {
                let ty = self.infer_at(schema, key, &property_path(path, key))?;
                let optional = !required.contains(key.as_str());
                Ok(FieldDef::new(key.clone(), ty.optional(optional)))
            })
            .collect()
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn infer_from_schema(schema: &Value, options: SchemaOptions) -> Result<TypeDef> {
    SchemaInferencer::new(options).infer(schema)
}

// ---------------------------- Keyword readers ----------------------------- //

fn schema_type<'a>(node: &'a Value, path: &str) -> Result<&'a str> {
    node.get("type")
        .ok_or_else(|| Error::missing("type", path))?
        .as_str()
        .ok_or_else(|| Error::invalid("type", path, "a string"))
}

fn required_keys<'a>(node: &'a Value, path: &str) -> Result<HashSet<&'a str>> {
    let Some(required) = node.get("required") else {
        return Ok(HashSet::new());
    };
    let invalid = || Error::invalid("required", path, "an array of strings");
    required
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|k| k.as_str().ok_or_else(invalid))
        .collect()
}

fn has_non_negative_lower_bound(node: &Value) -> bool {
    let bound = |keyword: &str| node.get(keyword).and_then(Value::as_f64);
    bound("minimum").is_some_and(|m| m >= 0.0) || bound("exclusiveMinimum").is_some_and(|m| m >= 0.0)
}

fn string_base(node: &Value, path: &str) -> Result<BaseType> {
    let Some(values) = node.get("enum") else {
        return Ok(BaseType::String);
    };
    let invalid = || Error::invalid("enum", path, "an array of strings");
    let values = values
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect::<Result<IndexSet<String>>>()?;
    if values.is_empty() {
        return Ok(BaseType::String);
    }
    Ok(BaseType::StringEnum(values.into_iter().collect()))
}

fn property_path(parent: &str, key: &str) -> String {
    format!("{parent}/properties/{}", key.replace('~', "~0").replace('/', "~1"))
}

// ------------------------------- Tests ------------------------------------ //
