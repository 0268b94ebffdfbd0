//! # entity-sql-core
//!
//! Builds parameterized SQL `INSERT` statements straight from in-memory
//! records, without a full ORM.
//!
//! A record exposes its declared shape through the [`Entity`] trait, usually
//! derived. The statement builder walks that shape: the record's type name
//! becomes the table, its fields become columns in declaration order, and
//! fields marked `#[column(embed)]` that hold a reference to another record
//! are flattened into the same column list.
//!
//! ```rust
//! use entity_sql_core::{build_insert_statement, Entity, SqlValue};
//!
//! #[derive(Entity)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let user = User {
//!     id: 1,
//!     name: String::from("alice"),
//!     email: None,
//! };
//!
//! let (sql, values) = build_insert_statement(Some(&user)).unwrap();
//! assert_eq!(sql, "INSERT INTO `User`(`id`,`name`,`email`) VALUES(?,?,?);");
//! assert_eq!(values[0], SqlValue::Int(1));
//! assert_eq!(values[2], SqlValue::Null);
//! ```
//!
//! Statement execution is left to the database driver: values that are
//! [`BoundValue::Scalar`] bind directly, [`BoundValue::Record`] hands back
//! a whole sub-record for the caller to encode.

pub mod builder;
pub mod entity;
pub mod error;

pub use builder::{BoundValue, SqlValue, StatementBuilder, ToSqlValue};
pub use entity::{Entity, Field, Kind, TypeDesc};
pub use error::{EntityError, InvalidReason, Result};

#[cfg(feature = "derive")]
pub use entity_sql_derive::Entity;

use tracing::debug;

/// Builds an INSERT statement for `entity`.
///
/// `None` stands for a missing value and is rejected. Otherwise a fresh
/// [`StatementBuilder`] introspects the entity once and the rendered
/// statement is returned with its values.
///
/// # Errors
///
/// Returns [`EntityError::InvalidEntity`] if `entity` is `None` or fails
/// introspection.
pub fn build_insert_statement(entity: Option<&dyn Entity>) -> Result<(String, Vec<BoundValue<'_>>)> {
    let entity = entity.ok_or(InvalidReason::Absent)?;
    let mut builder = StatementBuilder::new();
    builder.introspect(entity)?;
    let (sql, values) = builder.build();
    debug!(sql = %sql, values = values.len(), "built insert statement");
    Ok((sql, values))
}

/// Builds an INSERT statement for a statically typed entity.
///
/// # Errors
///
/// Returns [`EntityError::InvalidEntity`] if `entity` fails introspection.
pub fn insert_statement<E: Entity>(entity: &E) -> Result<(String, Vec<BoundValue<'_>>)> {
    build_insert_statement(Some(entity))
}
