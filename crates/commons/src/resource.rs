//! Table mapping for repository resources.
//!
//! A [`Resource`] ties a row type to its table: identifiers for the table
//! and its columns, a mapping from a result row, and the column/value
//! pairs that populate write statements. [`IdentifiableResource`] adds a
//! single-column identifier on top, which unlocks the id-level CRUD
//! operations.

use std::collections::HashMap;

use sea_query::{DynIden, Order, Value};

use crate::page::{Direction, PageRequest};

/// Mapping between a SQL table and a row type.
pub trait Resource: Send + Sync + 'static {
    /// Mapped row type.
    type Row: Send + 'static;

    /// Table identifier.
    fn table() -> DynIden;

    /// Every column of the table, in SELECT order.
    fn columns() -> Vec<DynIden>;

    /// Maps a result row fetched with [`columns`](Resource::columns).
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self::Row>;

    /// Column/value pairs populating INSERT and UPDATE statements.
    ///
    /// Must cover every column of [`columns`](Resource::columns), in the
    /// same order.
    fn values(row: &Self::Row) -> Vec<(DynIden, Value)>;
}

/// A resource with a single-column identifier.
pub trait IdentifiableResource: Resource {
    /// Identifier type.
    type Id: Clone + PartialEq + Into<Value> + rusqlite::types::FromSql + Send + Sync + 'static;

    /// Identifier column.
    fn id_column() -> DynIden;

    /// Extracts the identifier of a row.
    fn id(row: &Self::Row) -> Self::Id;
}

/// Resolves the sorts of a page request against the columns of `T`.
///
/// Properties are matched against column names case-insensitively;
/// properties naming no column are dropped.
pub fn sort_orders<T: Resource>(request: &PageRequest) -> Vec<(DynIden, Order)> {
    let columns: HashMap<String, DynIden> = T::columns()
        .into_iter()
        .map(|column| (column.to_string().to_lowercase(), column))
        .collect();

    request
        .sorts()
        .iter()
        .filter_map(|sort| {
            columns.get(&sort.property().to_lowercase()).map(|column| {
                let order = match sort.direction() {
                    Direction::Asc => Order::Asc,
                    Direction::Desc => Order::Desc,
                };
                (column.clone(), order)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sea_query::{Iden, IntoIden};

    use super::*;
    use crate::page::Sort;

    #[derive(Iden)]
    enum Account {
        Table,
        Id,
        Email,
        Username,
    }

    struct AccountResource;

    impl Resource for AccountResource {
        type Row = ();

        fn table() -> DynIden {
            Account::Table.into_iden()
        }

        fn columns() -> Vec<DynIden> {
            vec![
                Account::Id.into_iden(),
                Account::Email.into_iden(),
                Account::Username.into_iden(),
            ]
        }

        fn from_row(_row: &rusqlite::Row<'_>) -> rusqlite::Result<()> {
            Ok(())
        }

        fn values(_row: &()) -> Vec<(DynIden, Value)> {
            Vec::new()
        }
    }

    fn resolved(request: &PageRequest) -> Vec<(String, Order)> {
        sort_orders::<AccountResource>(request)
            .into_iter()
            .map(|(column, order)| (column.to_string(), order))
            .collect()
    }

    #[test]
    fn resolves_sorts_against_columns() {
        let request =
            PageRequest::sorted(0, 25, vec![Sort::asc("id"), Sort::desc("username")]);

        assert_eq!(
            resolved(&request),
            vec![
                ("id".to_string(), Order::Asc),
                ("username".to_string(), Order::Desc)
            ]
        );
    }

    #[test]
    fn matches_properties_case_insensitively() {
        let request = PageRequest::sorted(0, 25, vec![Sort::desc("EMAIL")]);

        assert_eq!(resolved(&request), vec![("email".to_string(), Order::Desc)]);
    }

    #[test]
    fn drops_unknown_properties() {
        let request =
            PageRequest::sorted(0, 25, vec![Sort::asc("nope"), Sort::asc("id")]);

        assert_eq!(resolved(&request), vec![("id".to_string(), Order::Asc)]);
    }

    #[test]
    fn resolves_nothing_without_sorts() {
        assert!(resolved(&PageRequest::default()).is_empty());
    }
}
