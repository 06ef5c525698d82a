use crate::{Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// Entities read their fields through `as_value` when statements are generated
/// and write them back through `try_from_value` when rows are mapped. The
/// `as_empty_value` prototype is what the coercion pipeline uses as the
/// declared type of a field.
///
/// # Conversion rules
/// - The canonical variant is always accepted (`Value::Int32` for `i32`).
/// - Narrower numeric variants are widened, wider ones are range checked.
/// - A typed null is only accepted by `Option<T>`.
///
/// # Examples
/// ```rust
/// use quill_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Typed null of this type, the field prototype.
    fn as_empty_value() -> Value;
    /// Owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $(
                        #[allow(unreachable_patterns)]
                        $pat_rest => $expr_rest,
                    )*
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
        }
    };
}

/// Integer conversion, narrowing goes through `TryFrom` so out of range values fail.
macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl_as_value!(
            $source,
            $destination,
            Value::Int8(Some(v)) => Ok(v.try_into()?),
            Value::Int16(Some(v)) => Ok(v.try_into()?),
            Value::Int32(Some(v)) => Ok(v.try_into()?),
            Value::Int64(Some(v)) => Ok(v.try_into()?),
            Value::Int128(Some(v)) => Ok(v.try_into()?),
            Value::UInt8(Some(v)) => Ok(v.try_into()?),
            Value::UInt16(Some(v)) => Ok(v.try_into()?),
            Value::UInt32(Some(v)) => Ok(v.try_into()?),
            Value::UInt64(Some(v)) => Ok(v.try_into()?),
            Value::UInt128(Some(v)) => Ok(v.try_into()?),
            Value::Boolean(Some(v)) => Ok((v as u8).try_into()?),
            Value::Decimal(Some(v)) => {
                if !v.is_integer() {
                    return Err(Error::msg(format!(
                        "Value {v}: Decimal is not an integer, cannot convert to {}",
                        any::type_name::<Self>()
                    )));
                }
                v.to_i128()
                    .and_then(|v| v.try_into().ok())
                    .ok_or(Error::msg(format!(
                        "Value {v}: Decimal does not fit into {}",
                        any::type_name::<Self>()
                    )))
            },
        );
    };
}
impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(i128, Value::Int128);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);
impl_as_value_integer!(u128, Value::UInt128);

impl_as_value!(
    bool,
    Value::Boolean,
    Value::Int8(Some(v)) => Ok(v != 0),
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt8(Some(v)) => Ok(v != 0),
    Value::UInt16(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    f32,
    Value::Float32,
    Value::Float64(Some(v)) => Ok(v as _),
    Value::Int8(Some(v)) => Ok(v as _),
    Value::Int16(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v)) => v
        .to_f32()
        .ok_or(Error::msg(format!("Value {v}: Decimal does not fit into f32"))),
);
impl_as_value!(
    f64,
    Value::Float64,
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int8(Some(v)) => Ok(v as _),
    Value::Int16(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v)) => v
        .to_f64()
        .ok_or(Error::msg(format!("Value {v}: Decimal does not fit into f64"))),
);
impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int8(Some(v)) => Ok(v.into()),
    Value::Int16(Some(v)) => Ok(v.into()),
    Value::Int32(Some(v)) => Ok(v.into()),
    Value::Int64(Some(v)) => Ok(v.into()),
    Value::UInt8(Some(v)) => Ok(v.into()),
    Value::UInt16(Some(v)) => Ok(v.into()),
    Value::UInt32(Some(v)) => Ok(v.into()),
    Value::UInt64(Some(v)) => Ok(v.into()),
    Value::Float32(Some(v)) => Decimal::from_f32(v)
        .ok_or(Error::msg(format!("Value {v}: f32 cannot be represented as Decimal"))),
    Value::Float64(Some(v)) => Decimal::from_f64(v)
        .ok_or(Error::msg(format!("Value {v}: f64 cannot be represented as Decimal"))),
);
impl_as_value!(
    char,
    Value::Char,
    Value::Varchar(Some(ref v)) => {
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::msg(format!(
                "Cannot convert Value::Varchar `{v}` into a char, it must contain exactly one character"
            ))),
        }
    },
);
impl_as_value!(
    String,
    Value::Varchar,
    Value::Char(Some(v)) => Ok(v.into()),
    Value::Enum(Some(v), ..) => Ok(v),
);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(
    Vec<u8>,
    Value::Blob,
);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(OffsetDateTime, Value::TimestampWithTimezone);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(ref v)) => Ok(Uuid::parse_str(v)?),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }

    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }

    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
