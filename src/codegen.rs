//! Swift `Codable` emission.
//!
//! Declarations nest the way the model does: a nested struct or string enum
//! is written right after the field that owns it, one indentation level
//! deeper than its parent. Output is a pure function of the model and the
//! options, so emitting the same model twice gives byte-identical text.
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::ir::{BaseType, FieldDef, FieldType, StructDef, TypeDef};
use crate::naming;
use crate::options::EmitOptions;

/// Raw-value carrier written in front of the conformance list of string enums.
const ENUM_RAW_TYPE: &str = "String";

/// Name of the key-mapping enum; it shares a scope with nested declarations.
const KEY_MAPPING_NAME: &str = "CodingKeys";

pub struct Codegen {
    options: EmitOptions,
    indent: String,
    out: String,
}

impl Codegen {
    /// Options are validated once here; emission never re-checks them.
    pub fn new(options: EmitOptions) -> Result<Self> {
        options.validate()?;
        let indent = options.indent_unit.unit();
        Ok(Self { options, indent, out: String::new() })
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Append the declaration of `model`, named after `root_name`.
    ///
    /// Nothing is appended when emission fails.
    pub fn emit(&mut self, model: &TypeDef) -> Result<()> {
        let root_name = self.options.root_name.as_str();
        let mut text = String::new();
        match model {
            TypeDef::Struct(s) => self.write_struct(&mut text, 0, root_name, s)?,
            TypeDef::Enum(e) => self.write_enum(&mut text, 0, root_name, &e.raw_values),
        }
        tracing::debug!(root = root_name, bytes = text.len(), "emitted declaration");
        self.out.push_str(&text);
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.out
    }

    // ------------------------------ Structs ------------------------------- //

    fn write_struct(&self, out: &mut String, level: usize, name: &str, s: &StructDef) -> Result<()> {
        let mut fields: Vec<&FieldDef> = s.fields.iter().collect();
        if self.options.sorted_fields {
            fields.sort_by(|a, b| a.original_key.cmp(&b.original_key));
        }
        let identifiers = naming::resolve_collisions(
            fields
                .iter()
                .map(|f| self.options.variable_name_strategy.identifier(&f.original_key)),
        );

        let renamed = fields.iter().zip(&identifiers).any(|(f, id)| *id != f.original_key);
        let key_mapping = (renamed || self.options.always_emit_key_mapping) && !fields.is_empty();

        self.write_header(out, level, "struct", name, None);

        let mut nested_names = HashSet::new();
        if key_mapping {
            nested_names.insert(KEY_MAPPING_NAME.to_string());
        }
        for (field, identifier) in fields.iter().zip(&identifiers) {
            let type_name = match scalar_type_name(&field.ty.base) {
                Some(scalar) => scalar.to_string(),
                None => self.options.escaper.avoid_reserved(naming::nested_type_name(
                    self.options.object_name_strategy,
                    identifier,
                    field.ty.is_array,
                    self.options.drop_plural_suffix,
                )),
            };

            self.write_indent(out, level + 1);
            out.push_str(self.options.access_level.keyword());
            out.push_str(if self.options.mutable { " var " } else { " let " });
            out.push_str(&self.options.escaper.escape(identifier));
            out.push_str(": ");
            out.push_str(&render_field_type(&field.ty, &type_name));
            out.push('\n');

            if field.ty.is_nested() && !nested_names.insert(type_name.clone()) {
                return Err(Error::DuplicateNestedTypeName {
                    parent: name.to_string(),
                    name: type_name,
                });
            }
            match &field.ty.base {
                BaseType::Object(inner) => self.write_struct(out, level + 1, &type_name, inner)?,
                BaseType::StringEnum(values) => self.write_enum(out, level + 1, &type_name, values),
                _ => {}
            }
        }

        if key_mapping {
            self.write_indent(out, level + 1);
            out.push_str("private enum ");
            out.push_str(KEY_MAPPING_NAME);
            out.push_str(": String, CodingKey {\n");
            for (field, identifier) in fields.iter().zip(&identifiers) {
                self.write_case(out, level + 2, identifier, &field.original_key);
            }
            self.write_indent(out, level + 1);
            out.push_str("}\n");
        }

        self.write_indent(out, level);
        out.push_str("}\n");
        tracing::trace!(name, fields = fields.len(), level, "struct written");
        Ok(())
    }

    // ------------------------------- Enums -------------------------------- //

    fn write_enum(&self, out: &mut String, level: usize, name: &str, raw_values: &[String]) {
        self.write_header(out, level, "enum", name, Some(ENUM_RAW_TYPE));
        let identifiers = naming::resolve_collisions(
            raw_values
                .iter()
                .map(|raw| self.options.variable_name_strategy.identifier(raw)),
        );
        for (raw, identifier) in raw_values.iter().zip(&identifiers) {
            self.write_case(out, level + 1, identifier, raw);
        }
        self.write_indent(out, level);
        out.push_str("}\n");
    }

    // ------------------------------ Helpers ------------------------------- //

    fn write_header(&self, out: &mut String, level: usize, keyword: &str, name: &str, raw_type: Option<&str>) {
        self.write_indent(out, level);
        out.push_str(self.options.access_level.keyword());
        out.push(' ');
        out.push_str(keyword);
        out.push(' ');
        out.push_str(name);

        let conformances: Vec<&str> = raw_type
            .into_iter()
            .chain(self.options.interfaces().into_iter().filter(|i| Some(*i) != raw_type))
            .collect();
        if !conformances.is_empty() {
            out.push_str(": ");
            out.push_str(&conformances.join(", "));
        }
        out.push_str(" {\n");
    }

    /// `case identifier` plus an explicit literal when the two differ.
    fn write_case(&self, out: &mut String, level: usize, identifier: &str, raw: &str) {
        self.write_indent(out, level);
        out.push_str("case ");
        out.push_str(&self.options.escaper.escape(identifier));
        if identifier != raw {
            out.push_str(" = \"");
            out.push_str(&escape_literal(raw));
            out.push('"');
        }
        out.push('\n');
    }

    fn write_indent(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str(&self.indent);
        }
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn emit(model: &TypeDef, options: &EmitOptions) -> Result<String> {
    let mut cg = Codegen::new(options.clone())?;
    cg.emit(model)?;
    Ok(cg.into_string())
}

/// Array wrapper, then the base name, then the optional marker: `[Base]?`.
pub fn render_field_type(ty: &FieldType, base_name: &str) -> String {
    let mut rendered = if ty.is_array { format!("[{base_name}]") } else { base_name.to_string() };
    if ty.is_optional {
        rendered.push('?');
    }
    rendered
}

/// Names of the types that need no declaration of their own.
fn scalar_type_name(base: &BaseType) -> Option<&str> {
    match base {
        BaseType::Integer => Some("Int"),
        BaseType::Double => Some("Double"),
        BaseType::Boolean => Some("Bool"),
        BaseType::String => Some("String"),
        BaseType::Null => Some("NSNull"),
        BaseType::Uuid => Some("UUID"),
        BaseType::ForcedName(name) => Some(name),
        BaseType::Object(_) | BaseType::StringEnum(_) => None,
    }
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //
