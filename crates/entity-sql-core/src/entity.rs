//! Declared shape of records and their fields.
//!
//! Statement building inspects values through the [`Entity`] trait: what a
//! type was declared as ([`TypeDesc`]), which fields it carries
//! ([`Field`]), and what each field currently holds. Records implement it
//! with `#[derive(Entity)]`; scalars and reference wrappers are covered by
//! the impls in this module.

use crate::builder::value::{BoundValue, SqlValue};

/// Whether a type has named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A single value without named fields.
    Scalar,
    /// A structured record with named, ordered fields.
    Record,
}

/// Declared type information, independent of the value currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    /// Name of the underlying type once all references are stripped.
    pub name: &'static str,
    /// Kind of the underlying type.
    pub kind: Kind,
    /// Number of reference levels in the declared type.
    pub indirection: usize,
    /// Whether the type implements [`ToSqlValue`](crate::ToSqlValue).
    pub scalar_value: bool,
}

impl TypeDesc {
    /// Describes a scalar type. Scalars always provide their own value.
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Scalar,
            indirection: 0,
            scalar_value: true,
        }
    }

    /// Describes a record type.
    #[must_use]
    pub const fn record(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Record,
            indirection: 0,
            scalar_value: false,
        }
    }

    /// Marks the type as providing its own scalar value.
    #[must_use]
    pub const fn with_scalar_value(mut self) -> Self {
        self.scalar_value = true;
        self
    }

    /// Adds one level of reference around the type.
    #[must_use]
    pub const fn reference(mut self) -> Self {
        self.indirection += 1;
        self
    }

    /// Returns `true` if the underlying type is a record.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self.kind, Kind::Record)
    }

    /// Returns `true` for exactly one level of reference.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.indirection == 1
    }
}

/// A field of a record, as seen during statement building.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    /// Column name the field maps to.
    pub name: &'static str,
    /// Whether the field embeds another record, promoting its fields.
    pub embedded: bool,
    /// The value currently held by the field.
    pub value: &'a dyn Entity,
}

impl<'a> Field<'a> {
    /// Creates a plain field.
    #[must_use]
    pub const fn new(name: &'static str, value: &'a dyn Entity) -> Self {
        Self {
            name,
            embedded: false,
            value,
        }
    }

    /// Creates an embedded field.
    #[must_use]
    pub const fn embedded(name: &'static str, value: &'a dyn Entity) -> Self {
        Self {
            name,
            embedded: true,
            value,
        }
    }

    /// Returns the declared type of the field.
    #[must_use]
    pub fn type_desc(&self) -> TypeDesc {
        self.value.type_desc()
    }

    /// Returns `true` when the field should be flattened into the columns of
    /// its parent: embedded, a single reference to a record, and not a
    /// scalar value provider.
    #[must_use]
    pub fn is_flattened(&self) -> bool {
        let desc = self.type_desc();
        self.embedded && desc.is_reference() && desc.is_record() && !desc.scalar_value
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("embedded", &self.embedded)
            .field("type", &self.type_desc())
            .finish()
    }
}

/// A value whose declared shape can be inspected at run time.
///
/// Usually implemented through `#[derive(Entity)]`.
///
/// # Example
///
/// ```rust
/// use entity_sql_core::{BoundValue, Entity, Field, TypeDesc};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Entity for Point {
///     fn describe() -> TypeDesc {
///         TypeDesc::record("Point")
///     }
///
///     fn type_desc(&self) -> TypeDesc {
///         Self::describe()
///     }
///
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![Field::new("x", &self.x), Field::new("y", &self.y)]
///     }
///
///     fn bound_value(&self) -> BoundValue<'_> {
///         BoundValue::Record(self)
///     }
/// }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(point.fields().len(), 2);
/// ```
pub trait Entity {
    /// Returns the declared type information.
    fn describe() -> TypeDesc
    where
        Self: Sized;

    /// Returns the declared type information of this value.
    fn type_desc(&self) -> TypeDesc;

    /// Follows one level of reference.
    ///
    /// Returns `None` for a null reference and for non-reference types.
    fn pointee(&self) -> Option<&dyn Entity> {
        None
    }

    /// Returns the fields of a record in declaration order.
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    /// Returns the value bound for a column holding this value.
    fn bound_value(&self) -> BoundValue<'_>;
}

/// Implements [`Entity`] for types that are bound as a single scalar.
///
/// The types must implement [`ToSqlValue`](crate::ToSqlValue). Each type can
/// be given the name reported in its [`TypeDesc`]; without one the name is
/// taken from [`core::any::type_name`].
///
/// ```rust
/// use entity_sql_core::{scalar_entity, Entity, SqlValue, ToSqlValue};
///
/// struct Cents(i64);
///
/// impl ToSqlValue for Cents {
///     fn to_sql_value(&self) -> SqlValue {
///         SqlValue::Int(self.0)
///     }
/// }
///
/// scalar_entity!(Cents => "Cents");
///
/// assert_eq!(Cents::describe().name, "Cents");
/// ```
#[macro_export]
macro_rules! scalar_entity {
    (@impl $ty:ty, $name:expr) => {
        impl $crate::Entity for $ty {
            fn describe() -> $crate::TypeDesc {
                $crate::TypeDesc::scalar($name)
            }

            fn type_desc(&self) -> $crate::TypeDesc {
                <Self as $crate::Entity>::describe()
            }

            fn bound_value(&self) -> $crate::BoundValue<'_> {
                $crate::BoundValue::Scalar($crate::ToSqlValue::to_sql_value(self))
            }
        }
    };
    ($($ty:ty => $name:expr),+ $(,)?) => {
        $(
            $crate::scalar_entity!(@impl $ty, $name);
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::scalar_entity!(@impl $ty, ::core::any::type_name::<$ty>());
        )+
    };
}

scalar_entity!(
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    Vec<u8> => "Vec<u8>",
    SqlValue => "SqlValue",
);

#[cfg(feature = "chrono")]
scalar_entity!(
    chrono::DateTime<chrono::Utc> => "DateTime<Utc>",
    chrono::NaiveDateTime => "NaiveDateTime",
    chrono::NaiveDate => "NaiveDate",
);

#[cfg(feature = "json")]
scalar_entity!(serde_json::Value => "JsonValue");

// A string slice is a value, not a reference to a record; `&T` below only
// covers sized targets.
impl Entity for &str {
    fn describe() -> TypeDesc {
        TypeDesc::scalar("&str")
    }

    fn type_desc(&self) -> TypeDesc {
        Self::describe()
    }

    fn bound_value(&self) -> BoundValue<'_> {
        BoundValue::Scalar(crate::ToSqlValue::to_sql_value(*self))
    }
}

impl<T: Entity> Entity for Option<T> {
    fn describe() -> TypeDesc {
        T::describe().reference()
    }

    fn type_desc(&self) -> TypeDesc {
        Self::describe()
    }

    fn pointee(&self) -> Option<&dyn Entity> {
        self.as_ref().map(|value| value as &dyn Entity)
    }

    fn bound_value(&self) -> BoundValue<'_> {
        match self {
            Some(value) => value.bound_value(),
            None => BoundValue::Scalar(SqlValue::Null),
        }
    }
}

impl<T: Entity> Entity for Box<T> {
    fn describe() -> TypeDesc {
        T::describe().reference()
    }

    fn type_desc(&self) -> TypeDesc {
        Self::describe()
    }

    fn pointee(&self) -> Option<&dyn Entity> {
        Some(&**self)
    }

    fn bound_value(&self) -> BoundValue<'_> {
        (**self).bound_value()
    }
}

impl<T: Entity> Entity for &T {
    fn describe() -> TypeDesc {
        T::describe().reference()
    }

    fn type_desc(&self) -> TypeDesc {
        Self::describe()
    }

    fn pointee(&self) -> Option<&dyn Entity> {
        Some(*self)
    }

    fn bound_value(&self) -> BoundValue<'_> {
        (**self).bound_value()
    }
}
