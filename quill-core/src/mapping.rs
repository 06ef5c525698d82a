use crate::{
    ColumnMapping, Coercion, Entity, EntityMetadata, MetadataCache, OrmError, Result, Value,
};
use std::sync::Arc;

/// Shared context of the mapping engine: the metadata cache and the coercion registry.
///
/// Cloning is cheap, clones share the same cache.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pub metadata: Arc<MetadataCache>,
    pub coercion: Arc<Coercion>,
}

impl Mapping {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_coercion(coercion: Coercion) -> Self {
        Self {
            metadata: Default::default(),
            coercion: Arc::new(coercion),
        }
    }

    pub fn metadata<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        self.metadata.get::<E>()
    }

    /// Value of the mapped field, ready to be bound to a statement.
    pub fn bind_value<E: Entity>(
        &self,
        metadata: &EntityMetadata,
        entity: &E,
        mapping: &ColumnMapping,
    ) -> Result<Value> {
        let Some(value) = entity.get_field(mapping.field) else {
            return Err(OrmError::Mapping(format!(
                "column `{}` of `{}` has no readable field `{}`",
                mapping.column,
                metadata.table,
                mapping.field
            ))
            .into());
        };
        self.coercion
            .outgoing(value, metadata.field_def(mapping))
    }
}
