//! Routing configuration store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the per-copy-type model routing table.
//! - Guard default-model updates against the available-model set.
//!
//! # Invariants
//! - Config listing is deterministic: `copy_type ASC`.
//! - A default model must be a member of its row's available set.
//! - Updates confirm against storage before the caller sees new state.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::copy::CopyType;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by routing store operations.
pub type RoutingRepoResult<T> = Result<T, RoutingRepoError>;

/// Errors from routing store operations.
#[derive(Debug)]
pub enum RoutingRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No routing row exists for the copy type.
    ConfigNotFound(CopyType),
    /// Requested default model is outside the available set.
    ModelNotAvailable {
        copy_type: CopyType,
        model_id: String,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RoutingRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConfigNotFound(copy_type) => {
                write!(f, "routing config not found for copy type `{copy_type}`")
            }
            Self::ModelNotAvailable {
                copy_type,
                model_id,
            } => write!(
                f,
                "model `{model_id}` is not available for copy type `{copy_type}`"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "routing store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "routing store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "routing store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid routing data: {message}"),
        }
    }
}

impl Error for RoutingRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RoutingRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RoutingRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Routing record for one copy type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    pub copy_type: CopyType,
    /// Model used when the caller does not request one explicitly.
    pub default_model: String,
    /// Selectable models, in display order. The default is a member.
    pub available_models: Vec<String>,
    pub description: String,
    pub updated_at: i64,
}

/// Store interface for routing configuration.
pub trait RoutingStore {
    /// Lists every routing config sorted by `copy_type ASC`.
    fn list_configs(&self) -> RoutingRepoResult<Vec<RoutingConfig>>;
    /// Loads the config for one copy type.
    fn get_config(&self, copy_type: CopyType) -> RoutingRepoResult<Option<RoutingConfig>>;
    /// Replaces the default model and returns the stored record.
    fn update_default_model(
        &self,
        copy_type: CopyType,
        model_id: &str,
    ) -> RoutingRepoResult<RoutingConfig>;
}

/// SQLite-backed routing store.
pub struct SqliteRoutingStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoutingStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RoutingRepoResult<Self> {
        ensure_routing_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RoutingStore for SqliteRoutingStore<'_> {
    fn list_configs(&self) -> RoutingRepoResult<Vec<RoutingConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT copy_type, default_model, description, updated_at
             FROM routing_configs
             ORDER BY copy_type ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut configs = Vec::new();

        while let Some(row) = rows.next()? {
            configs.push(parse_routing_row(self.conn, row)?);
        }

        Ok(configs)
    }

    fn get_config(&self, copy_type: CopyType) -> RoutingRepoResult<Option<RoutingConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT copy_type, default_model, description, updated_at
             FROM routing_configs
             WHERE copy_type = ?1;",
        )?;
        let mut rows = stmt.query([copy_type.as_str()])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        Ok(Some(parse_routing_row(self.conn, row)?))
    }

    fn update_default_model(
        &self,
        copy_type: CopyType,
        model_id: &str,
    ) -> RoutingRepoResult<RoutingConfig> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let config_exists: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM routing_configs
                WHERE copy_type = ?1
            );",
            [copy_type.as_str()],
            |row| row.get(0),
        )?;
        if config_exists != 1 {
            return Err(RoutingRepoError::ConfigNotFound(copy_type));
        }

        let available: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM routing_available_models
                WHERE copy_type = ?1 AND model_id = ?2
            );",
            params![copy_type.as_str(), model_id],
            |row| row.get(0),
        )?;
        if available != 1 {
            return Err(RoutingRepoError::ModelNotAvailable {
                copy_type,
                model_id: model_id.to_string(),
            });
        }

        let changed = tx.execute(
            "UPDATE routing_configs
             SET default_model = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE copy_type = ?1;",
            params![copy_type.as_str(), model_id],
        )?;
        if changed == 0 {
            return Err(RoutingRepoError::ConfigNotFound(copy_type));
        }
        tx.commit()?;

        self.get_config(copy_type)?
            .ok_or(RoutingRepoError::ConfigNotFound(copy_type))
    }
}

fn parse_routing_row(conn: &Connection, row: &Row<'_>) -> RoutingRepoResult<RoutingConfig> {
    let type_text: String = row.get("copy_type")?;
    let copy_type = CopyType::parse(&type_text).ok_or_else(|| {
        RoutingRepoError::InvalidData(format!(
            "invalid copy type `{type_text}` in routing_configs.copy_type"
        ))
    })?;

    Ok(RoutingConfig {
        copy_type,
        default_model: row.get("default_model")?,
        available_models: load_available_models(conn, &type_text)?,
        description: row.get("description")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_available_models(conn: &Connection, copy_type: &str) -> RoutingRepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT model_id
         FROM routing_available_models
         WHERE copy_type = ?1
         ORDER BY sort_order ASC, model_id ASC;",
    )?;
    let mut rows = stmt.query([copy_type])?;
    let mut models = Vec::new();

    while let Some(row) = rows.next()? {
        models.push(row.get(0)?);
    }

    Ok(models)
}

fn ensure_routing_connection_ready(conn: &Connection) -> RoutingRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RoutingRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["routing_configs", "routing_available_models"] {
        if !routing_table_exists(conn, table)? {
            return Err(RoutingRepoError::MissingRequiredTable(table));
        }
    }

    for column in ["copy_type", "default_model", "description", "updated_at"] {
        if !routing_table_has_column(conn, "routing_configs", column)? {
            return Err(RoutingRepoError::MissingRequiredColumn {
                table: "routing_configs",
                column,
            });
        }
    }

    for column in ["copy_type", "model_id", "sort_order"] {
        if !routing_table_has_column(conn, "routing_available_models", column)? {
            return Err(RoutingRepoError::MissingRequiredColumn {
                table: "routing_available_models",
                column,
            });
        }
    }

    Ok(())
}

fn routing_table_exists(conn: &Connection, table: &str) -> RoutingRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn routing_table_has_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> RoutingRepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
