//! Infer a record-type model from a JSON sample or a JSON-Schema document and
//! emit it as Swift `Codable` declarations.
//!
//! ```no_run
//! use json_codable::{emit, infer_from_value, EmitOptions, ValueOptions};
//!
//! let doc = serde_json::json!({ "user_id": 7, "tags": ["a"] });
//! let model = infer_from_value(&doc, ValueOptions::default())?;
//! let swift = emit(&model.into(), &EmitOptions::default())?;
//! print!("{swift}");
//! # Ok::<(), json_codable::Error>(())
//! ```
pub mod batch;
pub mod codegen;
pub mod error;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod options;
pub mod path_de;
pub mod schema;

pub use codegen::{Codegen, emit};
pub use error::{Error, Result};
pub use inference::{ValueInferencer, ValueOptions, infer_from_value};
pub use ir::{BaseType, EnumDef, FieldDef, FieldType, StructDef, TypeDef};
pub use options::{Config, EmitOptions};
pub use schema::{SchemaInferencer, SchemaOptions, infer_from_schema};
