use crate::{AsValue, Error, FieldDef, OrmError, Result, Value};
use std::fmt::{self, Debug, Formatter};
use time::{PrimitiveDateTime, Time, UtcOffset};

/// Converts a raw cursor value towards the declared type of a field.
#[derive(Clone, Copy)]
pub struct ColumnHandler {
    pub name: &'static str,
    /// Receives the field prototype.
    pub matches: fn(target: &Value) -> bool,
    pub apply: fn(value: Value, target: &Value) -> Result<Value>,
}

/// Converts a value right before it is assigned to a field or bound to a statement.
#[derive(Clone, Copy)]
pub struct ValueHandler {
    pub name: &'static str,
    pub matches: fn(target: &Value, value: &Value) -> bool,
    pub apply: fn(target: &Value, value: Value) -> Result<Value>,
}

impl Debug for ColumnHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnHandler").field(&self.name).finish()
    }
}

impl Debug for ValueHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueHandler").field(&self.name).finish()
    }
}

/// Ordered registry of coercion handlers, the first matching handler wins.
///
/// Built once and then shared read only, lookups do not lock.
///
/// ```rust
/// use quill_core::{Coercion, ColumnHandler, Value};
/// let coercion = Coercion::empty().with_column_handler(ColumnHandler {
///     name: "uppercase",
///     matches: |target| matches!(target, Value::Varchar(..)),
///     apply: |value, _| Ok(Value::Varchar(Some(value.to_string().to_uppercase()))),
/// });
/// assert_eq!(coercion.column_handlers().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Coercion {
    column_handlers: Vec<ColumnHandler>,
    value_handlers: Vec<ValueHandler>,
}

impl Default for Coercion {
    fn default() -> Self {
        Self {
            column_handlers: default_column_handlers(),
            value_handlers: default_value_handlers(),
        }
    }
}

impl Coercion {
    /// Registry without any handler, every value passes through unchanged.
    pub fn empty() -> Self {
        Self {
            column_handlers: Vec::new(),
            value_handlers: Vec::new(),
        }
    }

    /// Appends a handler, it is consulted after the ones already registered.
    pub fn with_column_handler(mut self, handler: ColumnHandler) -> Self {
        self.column_handlers.push(handler);
        self
    }

    /// Appends a handler, it is consulted after the ones already registered.
    pub fn with_value_handler(mut self, handler: ValueHandler) -> Self {
        self.value_handlers.push(handler);
        self
    }

    pub fn column_handlers(&self) -> &[ColumnHandler] {
        &self.column_handlers
    }

    pub fn value_handlers(&self) -> &[ValueHandler] {
        &self.value_handlers
    }

    /// Cursor value towards the type of `field`.
    ///
    /// A null read into a non nullable primitive becomes its zero value, any
    /// other null becomes the typed null of the field.
    pub fn incoming(&self, value: Value, field: &FieldDef) -> Result<Value> {
        let target = &field.value;
        if value.is_null() {
            if !field.nullable
                && let Some(zero) = target.zero()
            {
                return Ok(zero);
            }
            return Ok(target.as_null());
        }
        let Some(handler) = self.column_handlers.iter().find(|h| (h.matches)(target)) else {
            return Ok(value);
        };
        let source = value.type_name();
        (handler.apply)(value, target).map_err(|e| {
            e.context(OrmError::type_mismatch(
                field.name,
                source,
                target.type_name(),
            ))
        })
    }

    /// Value towards the declared type of `field`, failing when the result is
    /// neither null nor of that type.
    pub fn outgoing(&self, value: Value, field: &FieldDef) -> Result<Value> {
        let target = &field.value;
        let source = value.type_name();
        let handler = self
            .value_handlers
            .iter()
            .find(|h| (h.matches)(target, &value));
        let value = match handler {
            Some(handler) => (handler.apply)(target, value).map_err(|e| {
                e.context(OrmError::type_mismatch(
                    field.name,
                    source,
                    target.type_name(),
                ))
            })?,
            None => value,
        };
        if value.is_null() || value.same_type(target) || *target == Value::Null {
            Ok(value)
        } else {
            Err(OrmError::type_mismatch(field.name, value.type_name(), target.type_name()).into())
        }
    }
}

macro_rules! column_handler {
    ($name:literal, $variant:path, $type:ty) => {
        ColumnHandler {
            name: $name,
            matches: |target| matches!(target, $variant(..)),
            apply: |value, _| Ok(<$type>::try_from_value(value)?.as_value()),
        }
    };
}

pub fn default_column_handlers() -> Vec<ColumnHandler> {
    vec![
        column_handler!("boolean", Value::Boolean, bool),
        column_handler!("byte", Value::Int8, i8),
        column_handler!("short", Value::Int16, i16),
        column_handler!("integer", Value::Int32, i32),
        column_handler!("long", Value::Int64, i64),
        column_handler!("float", Value::Float32, f32),
        column_handler!("double", Value::Float64, f64),
        ColumnHandler {
            name: "string",
            matches: |target| matches!(target, Value::Varchar(..)),
            apply: |value, _| {
                Ok(match value {
                    Value::Varchar(..) => value,
                    _ => Value::Varchar(Some(value.to_string())),
                })
            },
        },
        ColumnHandler {
            name: "timestamp",
            matches: |target| matches!(target, Value::Timestamp(..)),
            apply: |value, _| {
                let result = match value {
                    Value::Timestamp(..) => value,
                    Value::TimestampWithTimezone(Some(v)) => {
                        let v = v.to_offset(UtcOffset::UTC);
                        Value::Timestamp(Some(PrimitiveDateTime::new(v.date(), v.time())))
                    }
                    Value::Date(Some(v)) => {
                        Value::Timestamp(Some(PrimitiveDateTime::new(v, Time::MIDNIGHT)))
                    }
                    _ => {
                        return Err(Error::msg(format!(
                            "Cannot read {value:?} as a timestamp"
                        )));
                    }
                };
                Ok(result)
            },
        },
    ]
}

pub fn default_value_handlers() -> Vec<ValueHandler> {
    vec![
        ValueHandler {
            name: "temporal",
            matches: |target, value| match value {
                Value::Timestamp(Some(..)) => {
                    matches!(target, Value::Date(..) | Value::Time(..))
                }
                Value::TimestampWithTimezone(Some(..)) => {
                    matches!(
                        target,
                        Value::Timestamp(..) | Value::Date(..) | Value::Time(..)
                    )
                }
                _ => false,
            },
            apply: |target, value| {
                let timestamp = match value {
                    Value::Timestamp(Some(v)) => v,
                    Value::TimestampWithTimezone(Some(v)) => {
                        let v = v.to_offset(UtcOffset::UTC);
                        PrimitiveDateTime::new(v.date(), v.time())
                    }
                    _ => return Ok(value),
                };
                Ok(match target {
                    Value::Date(..) => Value::Date(Some(timestamp.date())),
                    Value::Time(..) => Value::Time(Some(timestamp.time())),
                    _ => Value::Timestamp(Some(timestamp)),
                })
            },
        },
        ValueHandler {
            name: "string_enum",
            matches: |target, value| {
                matches!(target, Value::Enum(..)) && matches!(value, Value::Varchar(Some(..)))
            },
            apply: |target, value| {
                let (Value::Enum(.., variants), Value::Varchar(Some(name))) = (target, value)
                else {
                    return Err(Error::msg("Expected a string and an enum target"));
                };
                if !variants.contains(&name.as_str()) {
                    return Err(Error::msg(format!(
                        "`{name}` is not one of the variants {variants:?}"
                    )));
                }
                Ok(Value::Enum(Some(name), *variants))
            },
        },
    ]
}
