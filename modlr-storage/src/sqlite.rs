//! SQLite persister.
//!
//! Collections map to tables with an `id TEXT PRIMARY KEY` column plus one
//! column per mapped field. SQLite index names share one namespace per
//! database, so the physical index name is prefixed with the collection.

use crate::config::SqliteOptions;
use crate::error::{StorageError, StorageResult};
use crate::logger::{QueryLogger, TracingQueryLogger};
use modlr_model::{
    derive_index_name, IndexDirection, IndexKey, IndexOptions, ModelMetadata, OPTION_BACKGROUND,
    OPTION_NAME, OPTION_SPARSE, OPTION_UNIQUE,
};
use modlr_schema::{AdapterError, BackingStore, Provisioned};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const PERSISTER_NAME: &str = "sqlite";

const SUPPORTED_OPTIONS: [&str; 4] = [OPTION_UNIQUE, OPTION_SPARSE, OPTION_NAME, OPTION_BACKGROUND];

pub struct SqliteStore {
    conn: Mutex<Connection>,
    logger: Arc<dyn QueryLogger>,
}

impl SqliteStore {
    /// Opens (or creates) a database file, creating parent directories as needed.
    pub fn open(path: &Path, options: &SqliteOptions) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        if let Some(ms) = options.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(ms))?;
        }
        info!(path = %path.display(), "Opened SQLite persister");
        Ok(Self::from_connection(conn))
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            logger: Arc::new(TracingQueryLogger),
        }
    }

    /// Replaces the statement logger.
    pub fn with_logger(mut self, logger: Arc<dyn QueryLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Physical name of index `name` on `collection`.
    pub fn physical_index_name(collection: &str, name: &str) -> String {
        format!("{collection}_{name}")
    }

    pub fn table_exists(&self, table: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        self.object_exists(&conn, "table", table)
    }

    pub fn index_exists(&self, index: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        self.object_exists(&conn, "index", index)
    }

    /// Column names of a table, in declaration order.
    pub fn table_columns(&self, table: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Stored `CREATE INDEX` statement of an index, if it exists.
    pub fn index_sql(&self, index: &str) -> StorageResult<Option<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT sql FROM sqlite_master WHERE type = 'index' AND name = ?1")?;
        let mut rows = stmt.query(params![index])?;
        match rows.next()? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(None),
        }
    }

    /// Creates the collection table unless it already exists.
    pub fn ensure_table(&self, metadata: &ModelMetadata) -> StorageResult<Provisioned> {
        let conn = self.lock()?;
        self.ensure_table_locked(&conn, metadata)
    }

    /// Creates an index on the collection unless one with the same physical name exists.
    ///
    /// The collection table is created first if it is missing. A physical name
    /// already taken by an index on another table is a conflict, not a match.
    pub fn ensure_index(
        &self,
        metadata: &ModelMetadata,
        keys: &[IndexKey],
        options: &IndexOptions,
    ) -> StorageResult<Provisioned> {
        if keys.is_empty() {
            return Err(StorageError::InvalidData(format!(
                "index on '{}' has no keys",
                metadata.collection
            )));
        }
        if let Some(option) = options.keys().find(|k| !SUPPORTED_OPTIONS.contains(k)) {
            return Err(StorageError::UnsupportedOption {
                option: option.to_string(),
                persister: PERSISTER_NAME.to_string(),
            });
        }

        let unique = options.unique()?;
        let sparse = options.sparse()?;
        options.background()?;

        let name = options
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| derive_index_name(keys));
        let physical = Self::physical_index_name(&metadata.collection, &name);

        let conn = self.lock()?;
        match self.index_table(&conn, &physical)? {
            Some(table) if table.eq_ignore_ascii_case(&metadata.collection) => {
                debug!(index = %physical, "Index already exists");
                return Ok(Provisioned::AlreadyExists);
            }
            Some(table) => {
                return Err(StorageError::InvalidData(format!(
                    "index name '{physical}' for '{}' is already used by an index on '{table}'",
                    metadata.collection
                )));
            }
            None => {}
        }
        self.ensure_table_locked(&conn, metadata)?;

        let columns = keys
            .iter()
            .map(|k| {
                let direction = match k.direction {
                    IndexDirection::Ascending => "ASC",
                    IndexDirection::Descending => "DESC",
                };
                format!("{} {direction}", quote_ident(&k.field))
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "CREATE {}INDEX {} ON {} ({columns})",
            if unique { "UNIQUE " } else { "" },
            quote_ident(&physical),
            quote_ident(&metadata.collection),
        );
        if sparse {
            let predicate = keys
                .iter()
                .map(|k| format!("{} IS NOT NULL", quote_ident(&k.field)))
                .collect::<Vec<_>>()
                .join(" OR ");
            sql.push_str(&format!(" WHERE {predicate}"));
        }

        self.execute(&conn, &sql)?;
        info!(index = %physical, collection = %metadata.collection, "Created index");
        Ok(Provisioned::Created)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn ensure_table_locked(
        &self,
        conn: &Connection,
        metadata: &ModelMetadata,
    ) -> StorageResult<Provisioned> {
        if self.object_exists(conn, "table", &metadata.collection)? {
            return Ok(Provisioned::AlreadyExists);
        }

        let mut columns = vec![format!("{} TEXT PRIMARY KEY", quote_ident("id"))];
        columns.extend(
            metadata
                .fields
                .iter()
                .filter(|f| f.name != "id")
                .map(|f| format!("{} {}", quote_ident(&f.name), f.field_type.sql_affinity())),
        );
        let sql = format!(
            "CREATE TABLE {} ({})",
            quote_ident(&metadata.collection),
            columns.join(", ")
        );

        self.execute(conn, &sql)?;
        info!(
            collection = %metadata.collection,
            model_type = %metadata.model_type,
            "Created table"
        );
        Ok(Provisioned::Created)
    }

    fn object_exists(&self, conn: &Connection, kind: &str, name: &str) -> StorageResult<bool> {
        const SQL: &str =
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2)";
        let started = Instant::now();
        let exists = conn.query_row(SQL, params![kind, name], |row| row.get::<_, bool>(0))?;
        self.logger.log_query(SQL, started.elapsed());
        Ok(exists)
    }

    /// Table an index is defined on, if the index exists.
    fn index_table(&self, conn: &Connection, index: &str) -> StorageResult<Option<String>> {
        const SQL: &str = "SELECT tbl_name FROM sqlite_master WHERE type = 'index' AND name = ?1";
        let started = Instant::now();
        let table = conn
            .query_row(SQL, params![index], |row| row.get::<_, String>(0))
            .optional()?;
        self.logger.log_query(SQL, started.elapsed());
        Ok(table)
    }

    fn execute(&self, conn: &Connection, sql: &str) -> StorageResult<()> {
        let started = Instant::now();
        conn.execute_batch(sql)?;
        self.logger.log_query(sql, started.elapsed());
        Ok(())
    }
}

impl BackingStore for SqliteStore {
    fn create_index(
        &self,
        metadata: &ModelMetadata,
        keys: &[IndexKey],
        options: &IndexOptions,
    ) -> Result<Provisioned, AdapterError> {
        self.ensure_index(metadata, keys, options).map_err(Into::into)
    }

    fn create_schemata(&self, metadata: &ModelMetadata) -> Result<Provisioned, AdapterError> {
        self.ensure_table(metadata).map_err(Into::into)
    }

    /// SQLite builds indices under a write lock; there is no non-blocking mode.
    fn supports_background_build(&self, _metadata: &ModelMetadata) -> bool {
        false
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("email"), "\"email\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn physical_name_is_prefixed() {
        assert_eq!(SqliteStore::physical_index_name("users", "by_email"), "users_by_email");
    }
}
