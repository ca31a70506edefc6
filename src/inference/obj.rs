use serde_json::{Map, Value};

use crate::error::Result;
use crate::ir::{FieldDef, FieldType, StructDef};

/// Build a struct from an object's members in source order, inferring each
/// member with `field`.
pub fn build_struct<F>(name: &str, map: &Map<String, Value>, mut field: F) -> Result<StructDef>
where
    F: FnMut(&str, &Value) -> Result<FieldType>,
{
    let fields = map
        .iter()
        .map(|(key, value)| Ok(FieldDef::new(key.clone(), field(key, value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(StructDef::new(name, fields))
}
