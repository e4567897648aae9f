use crate::error::Result;
use crate::types::GdpRecord;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Owns the process-local SQLite handle. The connection is released when the
/// value drops, on success and failure paths alike.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!("Opened SQLite database at {}", path.display());
        Ok(Self { conn })
    }

    /// Replaces `table_name` with the given records: any existing table of
    /// that name is dropped, and the new rows are inserted inside a single
    /// transaction. No index column is persisted.
    pub fn replace_table(&mut self, table_name: &str, records: &[GdpRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            r#"
            DROP TABLE IF EXISTS "{table_name}";
            CREATE TABLE "{table_name}" (
                Country TEXT NOT NULL,
                GDP_USD_billions REAL NOT NULL
            );
            "#
        ))?;

        {
            let mut stmt = tx.prepare(&format!(
                r#"INSERT INTO "{table_name}" (Country, GDP_USD_billions) VALUES (?1, ?2)"#
            ))?;
            for record in records {
                stmt.execute(params![record.country, record.gdp_usd_billions])?;
            }
        }
        tx.commit()?;

        info!("Loaded {} rows into table {}", records.len(), table_name);
        Ok(())
    }

    /// Runs an arbitrary SQL statement and captures the result as column
    /// names plus stringified rows. The statement is passed through without
    /// validation; any execution error propagates.
    pub fn run_query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut output_rows = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..columns.len() {
                let value = match row.get_ref(index)? {
                    ValueRef::Null => "NULL".to_string(),
                    ValueRef::Integer(v) => v.to_string(),
                    ValueRef::Real(v) => v.to_string(),
                    ValueRef::Text(v) => String::from_utf8_lossy(v).to_string(),
                    ValueRef::Blob(v) => format!("<{} bytes>", v.len()),
                };
                values.push(value);
            }
            output_rows.push(values);
        }

        debug!("Query returned {} rows", output_rows.len());
        Ok(QueryOutput {
            columns,
            rows: output_rows,
        })
    }
}

/// Tabular result of an ad-hoc query, already stringified for display.
#[derive(Debug)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryOutput {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|column| column.len()).collect();
        for row in &self.rows {
            for (index, value) in row.iter().enumerate() {
                if value.len() > widths[index] {
                    widths[index] = value.len();
                }
            }
        }

        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:<width$}", column, width = widths[index])?;
        }
        writeln!(f)?;

        for row in &self.rows {
            for (index, value) in row.iter().enumerate() {
                if index > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:<width$}", value, width = widths[index])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
