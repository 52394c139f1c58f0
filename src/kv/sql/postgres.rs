//! PostgreSQL table used as a key-value store.

use std::cell::RefCell;

use postgres::{Client, Config, NoTls, Statement};

use super::{KvStatements, quote_identifier};
use crate::cast::Dialect;
use crate::error::{Error, Result};
use crate::kv::backend::ByteStore;
use crate::logging::{debug, info};

/// Database the wipe connects to while dropping the target.
const MAINTENANCE_DB: &str = "postgres";

/// A PostgreSQL table used as a byte store.
///
/// Holds one synchronous connection with the PUT and GET statements
/// prepared on it. Not `Sync`.
pub struct PostgresStore {
    client: RefCell<Client>,
    put: Statement,
    get: Statement,
    statements: KvStatements,
}

impl PostgresStore {
    /// Connect and make sure `table` exists.
    pub fn connect(conninfo: &str, table: &str) -> Result<Self> {
        let statements = KvStatements::new(Dialect::Postgres, table)?;
        debug!(table = table, "connecting to PostgreSQL");

        let mut client = Client::connect(conninfo, NoTls)?;
        client.batch_execute(&statements.create_table)?;
        let put = client.prepare(&statements.put)?;
        let get = client.prepare(&statements.get)?;

        Ok(Self {
            client: RefCell::new(client),
            put,
            get,
            statements,
        })
    }
}

impl ByteStore for PostgresStore {
    const NAME: &'static str = "postgres";

    fn put_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        self.client.borrow_mut().execute(&self.put, &[&key, &value])?;
        Ok(())
    }

    /// A NULL value column reads as no bytes.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let row = self.client.borrow_mut().query_opt(&self.get, &[&key])?;
        let value = row
            .map(|row| row.try_get::<_, Option<Vec<u8>>>(0))
            .transpose()?
            .map(Option::unwrap_or_default);
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.client
            .borrow_mut()
            .execute(self.statements.remove.as_str(), &[&key])?;
        Ok(())
    }

    fn truncate(&self) -> Result<()> {
        self.client
            .borrow_mut()
            .execute(self.statements.clear.as_str(), &[])?;
        debug!("cleared PostgreSQL table");
        Ok(())
    }
}

/// Drop the database named in `conninfo`.
///
/// Connects to the `postgres` maintenance database on the same server and
/// issues `DROP DATABASE IF EXISTS`.
pub fn wipe(conninfo: &str) -> Result<()> {
    let config: Config = conninfo.parse()?;
    let dbname = config
        .get_dbname()
        .ok_or_else(|| Error::backend(PostgresStore::NAME, "connection string names no database"))?
        .to_owned();

    info!(database = %dbname, "dropping PostgreSQL database");
    let mut admin = config.clone();
    admin.dbname(MAINTENANCE_DB);
    let mut client = admin.connect(NoTls)?;
    client.batch_execute(&format!("DROP DATABASE IF EXISTS {}", quote_identifier(&dbname)))?;
    Ok(())
}
