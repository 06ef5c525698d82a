use crate::{Result, Value};

/// Declared field of an entity, as written by `#[derive(Entity)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Rust field name.
    pub name: &'static str,
    /// Column this field is stored into, when it is an ordinary column.
    pub column: Option<&'static str>,
    /// Column name when the field is part of the primary key.
    pub id: Option<&'static str>,
    /// Type prototype, a typed null of the field type.
    pub value: Value,
    /// Field type is `Option<_>`.
    pub nullable: bool,
}

impl FieldDef {
    pub fn new(name: &'static str, value: Value) -> Self {
        Self {
            name,
            column: None,
            id: None,
            value,
            nullable: false,
        }
    }
    pub fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }
    pub fn id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
    /// Declared with either a column or an id.
    pub fn is_mapped(&self) -> bool {
        self.column.is_some() || self.id.is_some()
    }
}

/// Static declarations of an entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    /// Rust type name.
    pub name: &'static str,
    pub table: Option<&'static str>,
    pub fields: Box<[FieldDef]>,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|v| v.name == name)
    }
}

/// A record type mapped to a table row.
///
/// The engine never looks inside the record other than through this accessor
/// contract: fields are read as [`Value`] and written back from one.
/// Implementations are normally generated by `#[derive(Entity)]`.
pub trait Entity: Default + Send + Sync + 'static {
    fn descriptor() -> &'static EntityDescriptor;

    /// Current value of the field, `None` when the type has no such field.
    fn get_field(&self, field: &str) -> Option<Value>;

    /// Assign the field from a value already coerced to its declared type.
    fn set_field(&mut self, field: &str, value: Value) -> Result<()>;
}
