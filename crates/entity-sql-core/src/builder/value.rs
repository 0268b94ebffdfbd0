//! Bound values and the scalar conversion capability.
//!
//! [`ToSqlValue`] is the hook a type implements to supply its own single
//! scalar representation. Types carrying it are bound as one value and are
//! never flattened into columns, even when they are records.

use std::fmt;

use crate::entity::Entity;

/// A scalar SQL value that can be bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns `true` for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Trait for types that provide their own scalar SQL value.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(&self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(&self) -> SqlValue {
        self.clone()
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

macro_rules! int_to_sql_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_to_sql_value!(i8, i16, i32, i64, u8, u16, u32);

// Wider integers bind as `Int` while they fit in an `i64` and as their
// decimal text otherwise.
macro_rules! wide_int_to_sql_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(&self) -> SqlValue {
                    i64::try_from(*self)
                        .map_or_else(|_| SqlValue::Text(self.to_string()), SqlValue::Int)
                }
            }
        )*
    };
}

wide_int_to_sql_value!(i128, isize, u64, u128, usize);

impl ToSqlValue for char {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(*self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(f64::from(*self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Blob(self.clone())
    }
}

impl ToSqlValue for [u8] {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        self.as_ref().map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl<T: ToSqlValue + ?Sized> ToSqlValue for &T {
    fn to_sql_value(&self) -> SqlValue {
        (**self).to_sql_value()
    }
}

impl<T: ToSqlValue + ?Sized> ToSqlValue for Box<T> {
    fn to_sql_value(&self) -> SqlValue {
        (**self).to_sql_value()
    }
}

#[cfg(feature = "chrono")]
mod temporal {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    use super::{SqlValue, ToSqlValue};

    impl ToSqlValue for DateTime<Utc> {
        fn to_sql_value(&self) -> SqlValue {
            SqlValue::Text(self.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    }

    impl ToSqlValue for NaiveDateTime {
        fn to_sql_value(&self) -> SqlValue {
            SqlValue::Text(self.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    }

    impl ToSqlValue for NaiveDate {
        fn to_sql_value(&self) -> SqlValue {
            SqlValue::Text(self.format("%Y-%m-%d").to_string())
        }
    }
}

#[cfg(feature = "json")]
impl ToSqlValue for serde_json::Value {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Self::Null => SqlValue::Null,
            other => SqlValue::Text(other.to_string()),
        }
    }
}

/// One entry of the values sequence returned next to an INSERT statement.
///
/// Fields whose type provides a scalar are bound as [`BoundValue::Scalar`].
/// Any other record-typed field is handed over whole, borrowed from the
/// input, as [`BoundValue::Record`].
#[derive(Clone)]
pub enum BoundValue<'a> {
    /// A scalar parameter.
    Scalar(SqlValue),
    /// An opaque sub-record.
    Record(&'a dyn Entity),
}

impl<'a> BoundValue<'a> {
    /// Returns the scalar value, if this is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&SqlValue> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Record(_) => None,
        }
    }

    /// Returns the borrowed sub-record, if this is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&'a dyn Entity> {
        match self {
            Self::Scalar(_) => None,
            Self::Record(record) => Some(*record),
        }
    }

    /// Consumes the value, keeping only a scalar.
    #[must_use]
    pub fn into_scalar(self) -> Option<SqlValue> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Record(_) => None,
        }
    }
}

impl fmt::Debug for BoundValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Record(record) => f
                .debug_tuple("Record")
                .field(&record.type_desc().name)
                .finish(),
        }
    }
}

impl From<SqlValue> for BoundValue<'_> {
    fn from(value: SqlValue) -> Self {
        Self::Scalar(value)
    }
}

impl PartialEq<SqlValue> for BoundValue<'_> {
    fn eq(&self, other: &SqlValue) -> bool {
        self.as_scalar() == Some(other)
    }
}
