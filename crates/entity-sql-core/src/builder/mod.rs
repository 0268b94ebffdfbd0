//! INSERT statement building.
//!
//! # Example
//!
//! ```rust
//! use entity_sql_core::builder::StatementBuilder;
//! use entity_sql_core::Entity;
//!
//! #[derive(Entity)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let user = User { id: 1, name: String::from("alice") };
//! let mut builder = StatementBuilder::new();
//! builder.introspect(&user).unwrap();
//!
//! assert_eq!(builder.render(), "INSERT INTO `User`(`id`,`name`) VALUES(?,?);");
//! ```

mod insert;
pub mod value;

pub use insert::StatementBuilder;
pub use value::{BoundValue, SqlValue, ToSqlValue};
