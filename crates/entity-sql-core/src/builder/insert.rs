//! INSERT statement builder driven by a record's declared shape.
//!
//! [`StatementBuilder`] walks one record, collecting a table name, columns
//! and bound values, then renders them as a parameterized statement:
//!
//! ```text
//! INSERT INTO `User`(`id`,`name`) VALUES(?,?);
//! ```

use std::collections::HashSet;

use tracing::{debug, trace};

use super::value::BoundValue;
use crate::entity::Entity;
use crate::error::{InvalidReason, Result};

/// Accumulates the pieces of one INSERT statement.
///
/// A builder is meant for a single statement. Columns are recorded in field
/// declaration order across the whole walk, and the first occurrence of a
/// column name wins.
#[derive(Debug, Default)]
pub struct StatementBuilder<'a> {
    table: Option<String>,
    columns: Vec<String>,
    values: Vec<BoundValue<'a>>,
    seen: HashSet<String>,
}

impl<'a> StatementBuilder<'a> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the table name instead of taking it from the record type.
    #[must_use]
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(quote_ident(table));
        self
    }

    /// Returns the quoted table name, if set.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns the quoted column names recorded so far.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the values recorded so far, aligned with [`Self::columns`].
    #[must_use]
    pub fn values(&self) -> &[BoundValue<'a>] {
        &self.values
    }

    /// Clears all accumulated state.
    pub fn reset(&mut self) {
        self.table = None;
        self.columns.clear();
        self.values.clear();
        self.seen.clear();
    }

    /// Collects the table, columns and values of `entity`.
    ///
    /// `entity` may be a record or a single reference to one. Fields marked
    /// as embedded that hold a reference to a record are flattened into the
    /// same column list; the field is then also recorded as its own column
    /// holding the whole sub-record.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidEntity`](crate::EntityError::InvalidEntity)
    /// if `entity` is a reference to a reference, a null reference, not a
    /// record, or a record without fields. Columns appended before the error
    /// stay in the builder.
    pub fn introspect(&mut self, entity: &'a dyn Entity) -> Result<()> {
        let record = resolve(entity)?;
        let desc = record.type_desc();
        if !desc.is_record() {
            return Err(InvalidReason::NotARecord.into());
        }
        let fields = record.fields();
        if fields.is_empty() {
            return Err(InvalidReason::NoFields.into());
        }

        if self.table.is_none() {
            trace!(table = desc.name, "table name taken from record type");
            self.table = Some(quote_ident(desc.name));
        }

        for field in fields {
            if self.has_column(field.name) {
                debug!(column = field.name, record = desc.name, "skipping duplicate column");
                continue;
            }

            if field.is_flattened() {
                trace!(field = field.name, record = desc.name, "flattening embedded record");
                self.introspect(field.value)?;
                // The embedded record may already own a column of this name.
                if self.has_column(field.name) {
                    debug!(column = field.name, record = desc.name, "embedded record already recorded column");
                    continue;
                }
            }

            self.add_column(field.name, field.value.bound_value());
        }

        Ok(())
    }

    /// Renders the statement text.
    ///
    /// Returns an empty string when no table or no columns were recorded.
    #[must_use]
    pub fn render(&self) -> String {
        let Some(table) = self.table.as_deref() else {
            return String::new();
        };
        if self.columns.is_empty() {
            return String::new();
        }

        let placeholders = vec!["?"; self.values.len()];
        format!(
            "INSERT INTO {table}({}) VALUES({});",
            self.columns.join(","),
            placeholders.join(",")
        )
    }

    /// Renders the statement and returns it with its values.
    #[must_use]
    pub fn build(self) -> (String, Vec<BoundValue<'a>>) {
        let sql = self.render();
        (sql, self.values)
    }

    fn has_column(&self, name: &str) -> bool {
        self.seen.contains(&quote_ident(name))
    }

    fn add_column(&mut self, name: &str, value: BoundValue<'a>) {
        let column = quote_ident(name);
        self.seen.insert(column.clone());
        self.columns.push(column);
        self.values.push(value);
    }
}

/// Strips at most one level of reference.
fn resolve(entity: &dyn Entity) -> Result<&dyn Entity> {
    let desc = entity.type_desc();
    match desc.indirection {
        0 => Ok(entity),
        1 => entity
            .pointee()
            .ok_or_else(|| InvalidReason::NullReference.into()),
        _ => Err(InvalidReason::NestedReference.into()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("`{name}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Field, TypeDesc};
    use crate::error::EntityError;
    use crate::SqlValue;

    struct Audit {
        created_by: String,
        id: i64,
    }

    impl Entity for Audit {
        fn describe() -> TypeDesc {
            TypeDesc::record("Audit")
        }

        fn type_desc(&self) -> TypeDesc {
            Self::describe()
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("created_by", &self.created_by),
                Field::new("id", &self.id),
            ]
        }

        fn bound_value(&self) -> BoundValue<'_> {
            BoundValue::Record(self)
        }
    }

    struct Order {
        id: i64,
        audit: Option<Audit>,
        total: f64,
    }

    impl Entity for Order {
        fn describe() -> TypeDesc {
            TypeDesc::record("Order")
        }

        fn type_desc(&self) -> TypeDesc {
            Self::describe()
        }

        fn fields(&self) -> Vec<Field<'_>> {
            vec![
                Field::new("id", &self.id),
                Field::embedded("audit", &self.audit),
                Field::new("total", &self.total),
            ]
        }

        fn bound_value(&self) -> BoundValue<'_> {
            BoundValue::Record(self)
        }
    }

    struct Nothing;

    impl Entity for Nothing {
        fn describe() -> TypeDesc {
            TypeDesc::record("Nothing")
        }

        fn type_desc(&self) -> TypeDesc {
            Self::describe()
        }

        fn bound_value(&self) -> BoundValue<'_> {
            BoundValue::Record(self)
        }
    }

    fn order() -> Order {
        Order {
            id: 7,
            audit: Some(Audit {
                created_by: String::from("alice"),
                id: 99,
            }),
            total: 12.5,
        }
    }

    #[test]
    fn test_empty_builder_renders_nothing() {
        assert_eq!(StatementBuilder::new().render(), "");
    }

    #[test]
    fn test_table_without_columns_renders_nothing() {
        let builder = StatementBuilder::new().with_table("orders");
        assert_eq!(builder.table(), Some("`orders`"));
        assert_eq!(builder.render(), "");
    }

    #[test]
    fn test_flattens_embedded_record() {
        let order = order();
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();

        assert_eq!(builder.table(), Some("`Order`"));
        assert_eq!(
            builder.columns(),
            &["`id`", "`created_by`", "`audit`", "`total`"]
        );
        assert_eq!(builder.values()[0], SqlValue::Int(7));
        assert_eq!(
            builder.values()[1],
            SqlValue::Text(String::from("alice"))
        );
        assert!(builder.values()[2].as_record().is_some());
        assert_eq!(builder.values()[3], SqlValue::Float(12.5));
    }

    #[test]
    fn test_outer_column_wins_over_embedded() {
        let order = order();
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();

        let ids = builder.columns().iter().filter(|c| *c == "`id`").count();
        assert_eq!(ids, 1);
        assert_eq!(builder.values()[0], SqlValue::Int(7));
    }

    #[test]
    fn test_render_statement() {
        let order = order();
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();

        assert_eq!(
            builder.render(),
            "INSERT INTO `Order`(`id`,`created_by`,`audit`,`total`) VALUES(?,?,?,?);"
        );
    }

    #[test]
    fn test_preset_table_is_kept() {
        let order = order();
        let mut builder = StatementBuilder::new().with_table("orders");
        builder.introspect(&order).unwrap();
        assert_eq!(builder.table(), Some("`orders`"));
    }

    #[test]
    fn test_embedded_null_reference_fails() {
        let order = Order {
            id: 1,
            audit: None,
            total: 0.0,
        };
        let mut builder = StatementBuilder::new();
        let err = builder.introspect(&order).unwrap_err();
        assert_eq!(err, EntityError::InvalidEntity(InvalidReason::NullReference));
        assert_eq!(builder.columns(), &["`id`"]);
    }

    #[test]
    fn test_single_reference_is_followed() {
        let order = Box::new(order());
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();
        assert_eq!(builder.table(), Some("`Order`"));
        assert_eq!(builder.columns().len(), builder.values().len());
    }

    #[test]
    fn test_nested_reference_fails() {
        let order = Some(Box::new(order()));
        let mut builder = StatementBuilder::new();
        let err = builder.introspect(&order).unwrap_err();
        assert_eq!(err.reason(), InvalidReason::NestedReference);
    }

    #[test]
    fn test_null_reference_fails() {
        let order: Option<Order> = None;
        let mut builder = StatementBuilder::new();
        let err = builder.introspect(&order).unwrap_err();
        assert_eq!(err.reason(), InvalidReason::NullReference);
    }

    #[test]
    fn test_scalar_fails() {
        let mut builder = StatementBuilder::new();
        let err = builder.introspect(&5_i64).unwrap_err();
        assert_eq!(err.reason(), InvalidReason::NotARecord);
    }

    #[test]
    fn test_record_without_fields_fails() {
        let mut builder = StatementBuilder::new();
        let err = builder.introspect(&Nothing).unwrap_err();
        assert_eq!(err.reason(), InvalidReason::NoFields);
        assert_eq!(builder.table(), None);
    }

    #[test]
    fn test_reset_clears_state() {
        let order = order();
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();
        builder.reset();

        assert_eq!(builder.table(), None);
        assert!(builder.columns().is_empty());
        assert!(builder.values().is_empty());
        assert_eq!(builder.render(), "");
    }

    #[test]
    fn test_build_returns_aligned_values() {
        let order = order();
        let mut builder = StatementBuilder::new();
        builder.introspect(&order).unwrap();
        let (sql, values) = builder.build();
        assert_eq!(sql.matches('?').count(), values.len());
    }
}
