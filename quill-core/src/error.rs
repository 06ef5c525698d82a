use thiserror::Error;

/// Failures raised by the mapping engine.
///
/// Functions return `anyhow::Result`, this enum is either the error itself or
/// the context attached on top of a lower level cause. Classify with
/// `error.downcast_ref::<OrmError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrmError {
    #[error("Invalid metadata for `{entity}`: {reason}")]
    Metadata { entity: String, reason: String },

    #[error("Primary key of `{0}` is required but absent")]
    MissingKey(String),

    #[error("Statement on `{0}` would affect an empty or unconstrained set")]
    EmptyUpdate(String),

    #[error("Cannot assign a `{source_type}` to field `{field}` of type `{target_type}`")]
    TypeMismatch {
        field: String,
        source_type: String,
        target_type: String,
    },

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Cannot access field `{field}` of `{entity}`")]
    Access { entity: String, field: String },
}

impl OrmError {
    pub fn metadata(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        source_type: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }

    pub fn access(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Access {
            entity: entity.into(),
            field: field.into(),
        }
    }
}
