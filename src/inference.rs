//! Sample-document inference.
//!
//! Walk one decoded JSON document and build a [`StructDef`] tree from it.
//! The walk is exhaustive over `serde_json::Value`, so booleans, integers and
//! floating-point tokens are told apart by how they were decoded, never by
//! their numeric value.
//!
//! Policy, in short:
//! - objects become nested structs named after their key,
//! - arrays are typed by their first element (`[]` → array of strings),
//! - a root array stands for its first element,
//! - nothing inferred from a sample is optional; `null` is its own type.
pub mod arr;
pub mod num;
pub mod obj;
pub mod string;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{kind_name, Error, Result};
use crate::ir::{BaseType, FieldType, StructDef, DEFAULT_ROOT_NAME};
use crate::naming;

// ------------------------------- Options ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueOptions {
    /// Type canonical UUID strings as `uuid` instead of `string`.
    pub detect_uuid: bool,
}

impl Default for ValueOptions {
    fn default() -> Self {
        Self { detect_uuid: true }
    }
}

// ------------------------------ Inferencer -------------------------------- //

#[derive(Debug, Clone, Default)]
pub struct ValueInferencer {
    options: ValueOptions,
}

impl ValueInferencer {
    pub fn new(options: ValueOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValueOptions {
        &self.options
    }

    /// Infer the root struct of a document.
    ///
    /// Fails with [`Error::EmptyArray`] for `[]` and with
    /// [`Error::UnsupportedRootType`] when the root (or the first element of
    /// a root array) is not an object.
    pub fn infer(&self, value: &Value) -> Result<StructDef> {
        let root = self.infer_struct(DEFAULT_ROOT_NAME, value)?;
        tracing::debug!(fields = root.fields.len(), "inferred root struct");
        Ok(root)
    }

    fn infer_struct(&self, name: &str, value: &Value) -> Result<StructDef> {
        match value {
            Value::Object(map) => obj::build_struct(name, map, |key, v| self.infer_field(key, v)),
            Value::Array(xs) => match arr::representative(xs) {
                Some(first) => self.infer_struct(name, first),
                None => Err(Error::EmptyArray),
            },
            other => Err(Error::UnsupportedRootType { found: kind_name(other).to_string() }),
        }
    }

    /// Infer the type of one member value found under `key`.
    pub fn infer_field(&self, key: &str, value: &Value) -> Result<FieldType> {
        let ty = match value {
            Value::Null => FieldType::new(BaseType::Null),
            Value::Bool(_) => FieldType::new(BaseType::Boolean),
            Value::Number(n) => FieldType::new(num::classify_number(n)),
            Value::String(s) => FieldType::new(string::classify_str(s, self.options.detect_uuid)),
            Value::Array(xs) => match arr::representative(xs) {
                // nested arrays flatten onto the innermost element type
                Some(first) => FieldType::array_of(self.infer_field(key, first)?.base),
                None => FieldType::array_of(arr::EMPTY_ARRAY_ELEMENT),
            },
            Value::Object(_) => {
                let nested = self.infer_struct(&naming::type_name_for_key(key), value)?;
                tracing::trace!(key, name = %nested.name, "nested struct");
                FieldType::new(BaseType::Object(nested))
            }
        };
        Ok(ty)
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn infer_from_value(value: &Value, options: ValueOptions) -> Result<StructDef> {
    ValueInferencer::new(options).infer(value)
}

// ------------------------------- Tests ------------------------------------ //
