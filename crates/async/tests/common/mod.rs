//! Account fixture for the async repository tests.
#![allow(dead_code)]

use quarry_async::AsyncSqlRepository;
use quarry_commons::{IdentifiableResource, Resource};
use rusqlite::Connection;
use sea_query::{DynIden, Iden, IntoIden, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl Account {
    pub fn new(id: &str, email: &str, username: &str) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            username: username.into(),
        }
    }
}

#[derive(Iden)]
pub enum AccountIden {
    #[iden = "account"]
    Table,
    Id,
    Email,
    Username,
}

pub struct AccountResource;

impl Resource for AccountResource {
    type Row = Account;

    fn table() -> DynIden {
        AccountIden::Table.into_iden()
    }

    fn columns() -> Vec<DynIden> {
        vec![
            AccountIden::Id.into_iden(),
            AccountIden::Email.into_iden(),
            AccountIden::Username.into_iden(),
        ]
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
        Ok(Account {
            id: row.get(0)?,
            email: row.get(1)?,
            username: row.get(2)?,
        })
    }

    fn values(row: &Account) -> Vec<(DynIden, Value)> {
        vec![
            (AccountIden::Id.into_iden(), row.id.clone().into()),
            (AccountIden::Email.into_iden(), row.email.clone().into()),
            (AccountIden::Username.into_iden(), row.username.clone().into()),
        ]
    }
}

impl IdentifiableResource for AccountResource {
    type Id = String;

    fn id_column() -> DynIden {
        AccountIden::Id.into_iden()
    }

    fn id(row: &Account) -> String {
        row.id.clone()
    }
}

pub fn system() -> Account {
    Account::new("1", "system@quarry.test", "system")
}

pub fn admin() -> Account {
    Account::new("2", "admin@quarry.test", "admin")
}

pub fn john_doe() -> Account {
    Account::new("3", "john.doe@quarry.test", "johndoe")
}

/// A repository over an in-memory database seeded with the two default
/// accounts.
pub fn repository() -> AsyncSqlRepository<AccountResource> {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.execute_batch(
        "CREATE TABLE account (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            username TEXT NOT NULL
        )",
    )
    .expect("account table");

    for account in [system(), admin()] {
        conn.execute(
            "INSERT INTO account (id, email, username) VALUES (?1, ?2, ?3)",
            rusqlite::params![account.id, account.email, account.username],
        )
        .expect("insert fixture row");
    }

    AsyncSqlRepository::from_connection(conn)
}
