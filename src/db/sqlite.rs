use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::{
    generator::{InsertScript, StatementGenerator},
    value::Value,
    Error, Query,
};

use super::conversion::ToValue;

pub struct SQLite {
    path: String,
}

impl SQLite {
    pub fn new(path: String) -> Self {
        SQLite { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn convert_row(row: &rusqlite::Row, width: usize) -> rusqlite::Result<Vec<Value>> {
        (0..width)
            .map(|i| row.get_ref(i).map(|value| value.to_value()))
            .collect()
    }
}

impl Query for SQLite {
    async fn export(
        &self,
        query: &str,
        generator: &StatementGenerator,
    ) -> Result<InsertScript, Error> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::connect(&self.path, e))?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| Error::connect(&self.path, e))?;
        info!("Opened SQLite database {}", self.path);

        let mut stmt = conn.prepare(query).map_err(Error::query)?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<String>>();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| SQLite::convert_row(row, width))
            .map_err(Error::query)?;
        info!("Executed query: {}", query);

        Ok(generator.generate(&columns, rows)?)
    }
}
