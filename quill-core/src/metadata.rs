use crate::{Entity, EntityDescriptor, FieldDef, OrmError, Result};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Correspondence between a table column and an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column: &'static str,
    pub field: &'static str,
    /// Position of the field in [`EntityDescriptor::fields`].
    pub index: usize,
}

/// Table, columns and primary key of an entity type, validated.
///
/// Both mappings keep the field declaration order, which is also the order
/// columns are rendered in generated statements.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    pub descriptor: &'static EntityDescriptor,
    pub table: &'static str,
    /// Ordinary (non key) columns.
    pub columns: Box<[ColumnMapping]>,
    pub primary_key: Box<[ColumnMapping]>,
}

impl EntityMetadata {
    pub fn of<E: Entity>() -> Result<Self> {
        Self::load(E::descriptor())
    }

    pub fn load(descriptor: &'static EntityDescriptor) -> Result<Self> {
        let error = |reason: String| {
            log::warn!("Rejected metadata of `{}`: {}", descriptor.name, reason);
            OrmError::metadata(descriptor.name, reason)
        };
        if descriptor.fields.is_empty() {
            return Err(error("the type declares no fields".into()).into());
        }
        let table = match descriptor.table {
            Some(table) if !table.is_empty() => table,
            Some(..) => return Err(error("the table name is empty".into()).into()),
            None => return Err(error("no table name is declared".into()).into()),
        };
        let mut columns = Vec::new();
        let mut primary_key = Vec::new();
        for (index, field) in descriptor.fields.iter().enumerate() {
            let FieldDef {
                name, column, id, ..
            } = field;
            let (list, column) = match (column, id) {
                (None, None) => continue,
                (Some(..), Some(..)) => {
                    return Err(error(format!(
                        "field `{name}` is declared both as column and as primary key"
                    ))
                    .into());
                }
                (Some(column), None) => (&mut columns, *column),
                (None, Some(id)) => (&mut primary_key, *id),
            };
            if column.is_empty() {
                return Err(error(format!("field `{name}` declares an empty column name")).into());
            }
            list.push(ColumnMapping {
                column,
                field: *name,
                index,
            });
        }
        if columns.is_empty() && primary_key.is_empty() {
            return Err(error("no field is mapped to a column".into()).into());
        }
        let mut seen = Vec::with_capacity(columns.len() + primary_key.len());
        for mapping in columns.iter().chain(primary_key.iter()) {
            if seen.contains(&mapping.column) {
                return Err(error(format!(
                    "column `{}` is declared more than once",
                    mapping.column
                ))
                .into());
            }
            seen.push(mapping.column);
        }
        Ok(Self {
            descriptor,
            table,
            columns: columns.into(),
            primary_key: primary_key.into(),
        })
    }

    /// Ordinary columns followed by the primary key columns.
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnMapping> + Clone {
        self.columns.iter().chain(self.primary_key.iter())
    }

    pub fn field_def(&self, mapping: &ColumnMapping) -> &'static FieldDef {
        &self.descriptor.fields[mapping.index]
    }

    /// Mapping whose field is named `field`.
    pub fn by_field(&self, field: &str) -> Option<&ColumnMapping> {
        self.all_columns().find(|v| v.field == field)
    }

    /// Mapping whose column matches `column`, ignoring ASCII case.
    pub fn by_column(&self, column: &str) -> Option<&ColumnMapping> {
        self.all_columns()
            .find(|v| v.column.eq_ignore_ascii_case(column))
    }
}

/// Per type cache of [`EntityMetadata`].
///
/// Read mostly. Two callers loading the same type concurrently both store a
/// structurally equal value, the last write wins.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        let key = TypeId::of::<E>();
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(metadata) = entries.get(&key) {
                return Ok(metadata.clone());
            }
        }
        let metadata = Arc::new(EntityMetadata::of::<E>()?);
        log::trace!(
            "Caching metadata of `{}` (table `{}`, {} columns, {} key columns)",
            E::descriptor().name,
            metadata.table,
            metadata.columns.len(),
            metadata.primary_key.len(),
        );
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, metadata.clone());
        Ok(metadata)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
