// Type model shared by both inferencers and the emitter. No serde_json::Value here.

use indexmap::IndexSet;

/// Name given to an inferred root before the emitter renames it.
pub const DEFAULT_ROOT_NAME: &str = "Model";

#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    Integer,
    Double,
    Boolean,
    String,
    Null,
    Uuid,
    ForcedName(String),      // emitted verbatim, e.g. `UInt`
    Object(StructDef),       // fully resolved nested struct
    StringEnum(Vec<String>), // non-empty, schema-declared order
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub base: BaseType,
    pub is_array: bool,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub original_key: String, // verbatim source property name
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<FieldDef>, // source order; the emitter may sort
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub raw_values: Vec<String>, // distinct, first-seen order
}

/// Root of an emitted declaration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    Struct(StructDef),
    Enum(EnumDef),
}

impl FieldType {
    pub fn new(base: BaseType) -> Self {
        Self { base, is_array: false, is_optional: false }
    }

    pub fn array_of(base: BaseType) -> Self {
        Self { base, is_array: true, is_optional: false }
    }

    pub fn optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    /// `true` when the base needs its own nested declaration.
    pub fn is_nested(&self) -> bool {
        matches!(self.base, BaseType::Object(_) | BaseType::StringEnum(_))
    }
}

impl FieldDef {
    pub fn new(original_key: impl Into<String>, ty: FieldType) -> Self {
        Self { original_key: original_key.into(), ty }
    }
}

impl StructDef {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self { name: name.into(), fields }
    }

    pub fn field(&self, original_key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.original_key == original_key)
    }

    /// Direct nested struct children, in field order.
    pub fn nested(&self) -> impl Iterator<Item = &StructDef> {
        self.fields.iter().filter_map(|f| match &f.ty.base {
            BaseType::Object(s) => Some(s),
            _ => None,
        })
    }
}

impl EnumDef {
    /// Duplicate raw values are dropped; the first occurrence keeps its position.
    pub fn new<I, S>(name: impl Into<String>, raw_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: IndexSet<String> = raw_values.into_iter().map(Into::into).collect();
        Self { name: name.into(), raw_values: set.into_iter().collect() }
    }
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Struct(s) => &s.name,
            TypeDef::Enum(e) => &e.name,
        }
    }

    pub fn as_struct(&self) -> Option<&StructDef> {
        match self {
            TypeDef::Struct(s) => Some(s),
            TypeDef::Enum(_) => None,
        }
    }
}

impl From<StructDef> for TypeDef {
    fn from(s: StructDef) -> Self { TypeDef::Struct(s) }
}

impl From<EnumDef> for TypeDef {
    fn from(e: EnumDef) -> Self { TypeDef::Enum(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_def_dedups_in_encounter_order() {
        let e = EnumDef::new("Status", ["on", "off", "on", "idle"]);
        assert_eq!(e.raw_values, vec!["on", "off", "idle"]);
    }

    #[test]
    fn nested_walks_object_fields_only() {
        let inner = StructDef::new("Inner", vec![]);
        let outer = StructDef::new("Outer", vec![
            FieldDef::new("a", FieldType::new(BaseType::Integer)),
            FieldDef::new("b", FieldType::array_of(BaseType::Object(inner.clone()))),
            FieldDef::new("c", FieldType::new(BaseType::StringEnum(vec!["x".into()]))),
        ]);
        let nested: Vec<_> = outer.nested().collect();
        assert_eq!(nested, vec![&inner]);
        assert!(outer.field("c").unwrap().ty.is_nested());
        assert!(!outer.field("a").unwrap().ty.is_nested());
    }
}
