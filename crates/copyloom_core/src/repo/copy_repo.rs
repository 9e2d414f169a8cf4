//! Copy repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over copies, sessions and blocks storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `CopyDocument::validate()` before SQL mutations.
//! - Sessions and blocks are read back `sort_order ASC, uuid ASC`.
//! - Saving a copy replaces its whole session tree in one transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::block::{Block, BlockBody, BlockType, ButtonConfig, ButtonSize, ListStyle};
use crate::model::copy::{
    CopyDocument, CopyId, CopyStatus, CopyType, CopyValidationError, WorkspaceId,
};
use crate::model::session::Session;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const COPY_SELECT_SQL: &str = "SELECT
    uuid,
    workspace_uuid,
    title,
    copy_type,
    status,
    is_template,
    created_by,
    created_at,
    updated_at
FROM copies";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for copy persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CopyValidationError),
    Db(DbError),
    NotFound(CopyId),
    InvalidData(String),
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
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "copy not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted copy data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "copy repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "copy repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "copy repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CopyValidationError> for RepoError {
    fn from(value: CopyValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing copies.
#[derive(Debug, Clone, Default)]
pub struct CopyListQuery {
    pub workspace: Option<WorkspaceId>,
    pub copy_type: Option<CopyType>,
    pub is_template: Option<bool>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Summary row for copy list views; the session tree is not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub id: CopyId,
    pub workspace_id: WorkspaceId,
    pub title: String,
    pub copy_type: CopyType,
    pub status: CopyStatus,
    pub is_template: bool,
    pub updated_at: i64,
}

/// Repository interface for copy CRUD operations.
pub trait CopyRepository {
    /// Persists a new copy with its full session tree.
    fn create_copy(&self, copy: &CopyDocument) -> RepoResult<CopyId>;
    /// Loads one copy with sessions and blocks fully assembled.
    fn get_copy(&self, id: CopyId) -> RepoResult<Option<CopyDocument>>;
    /// Lists copy summaries sorted by `updated_at DESC, uuid ASC`.
    fn list_copies(&self, query: &CopyListQuery) -> RepoResult<Vec<CopySummary>>;
    /// Replaces a copy's metadata and whole session tree atomically.
    fn save_copy(&self, copy: &CopyDocument) -> RepoResult<()>;
    /// Updates only the lifecycle status.
    fn set_status(&self, id: CopyId, status: CopyStatus) -> RepoResult<()>;
    /// Hard-deletes a copy together with its sessions and blocks.
    fn delete_copy(&self, id: CopyId) -> RepoResult<()>;
}

/// SQLite-backed copy repository.
pub struct SqliteCopyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCopyRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_copy_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CopyRepository for SqliteCopyRepository<'_> {
    fn create_copy(&self, copy: &CopyDocument) -> RepoResult<CopyId> {
        copy.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO copies (
                uuid,
                workspace_uuid,
                title,
                copy_type,
                status,
                is_template,
                created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                copy.id.to_string(),
                copy.workspace_id.to_string(),
                copy.title.as_str(),
                copy.copy_type.as_str(),
                copy.status.as_str(),
                bool_to_int(copy.is_template),
                copy.created_by.as_deref(),
            ],
        )?;
        insert_session_tree(&tx, copy)?;
        tx.commit()?;

        Ok(copy.id)
    }

    fn get_copy(&self, id: CopyId) -> RepoResult<Option<CopyDocument>> {
        let uuid = id.to_string();
        let mut stmt = self
            .conn
            .prepare(&format!("{COPY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([uuid.as_str()])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut copy = parse_copy_row(row)?;
        copy.sessions = load_sessions(self.conn, &uuid)?;

        Ok(Some(copy))
    }

    fn list_copies(&self, query: &CopyListQuery) -> RepoResult<Vec<CopySummary>> {
        let mut sql = String::from(
            "SELECT
                uuid,
                workspace_uuid,
                title,
                copy_type,
                status,
                is_template,
                updated_at
             FROM copies
             WHERE 1 = 1",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(workspace) = query.workspace {
            sql.push_str(" AND workspace_uuid = ?");
            bind_values.push(Value::Text(workspace.to_string()));
        }

        if let Some(copy_type) = query.copy_type {
            sql.push_str(" AND copy_type = ?");
            bind_values.push(Value::Text(copy_type.as_str().to_string()));
        }

        if let Some(is_template) = query.is_template {
            sql.push_str(" AND is_template = ?");
            bind_values.push(Value::Integer(bool_to_int(is_template)));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut summaries = Vec::new();

        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }

        Ok(summaries)
    }

    fn save_copy(&self, copy: &CopyDocument) -> RepoResult<()> {
        copy.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE copies
             SET
                workspace_uuid = ?2,
                title = ?3,
                copy_type = ?4,
                status = ?5,
                is_template = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                copy.id.to_string(),
                copy.workspace_id.to_string(),
                copy.title.as_str(),
                copy.copy_type.as_str(),
                copy.status.as_str(),
                bool_to_int(copy.is_template),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(copy.id));
        }

        // Cascades to blocks and list items via foreign keys.
        tx.execute(
            "DELETE FROM sessions WHERE copy_uuid = ?1;",
            [copy.id.to_string()],
        )?;
        insert_session_tree(&tx, copy)?;
        tx.commit()?;

        Ok(())
    }

    fn set_status(&self, id: CopyId, status: CopyStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE copies
             SET status = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_copy(&self, id: CopyId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM copies WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn insert_session_tree(tx: &Transaction<'_>, copy: &CopyDocument) -> RepoResult<()> {
    let copy_uuid = copy.id.to_string();
    for (session_index, session) in copy.sessions.iter().enumerate() {
        let session_uuid = session.id.to_string();
        tx.execute(
            "INSERT INTO sessions (uuid, copy_uuid, title, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                session_uuid.as_str(),
                copy_uuid.as_str(),
                session.title.as_str(),
                session_index as i64,
            ],
        )?;

        for (block_index, block) in session.blocks.iter().enumerate() {
            insert_block(tx, &copy_uuid, &session_uuid, block, block_index as i64)?;
        }
    }

    Ok(())
}

fn insert_block(
    tx: &Transaction<'_>,
    copy_uuid: &str,
    session_uuid: &str,
    block: &Block,
    sort_order: i64,
) -> RepoResult<()> {
    let (content, list_style, config): (&str, Option<&'static str>, Option<&ButtonConfig>) =
        match &block.body {
            BlockBody::Text { content }
            | BlockBody::Headline { content }
            | BlockBody::Subheadline { content } => (content.as_str(), None, None),
            BlockBody::List { style, .. } => ("", Some(list_style_to_db(*style)), None),
            BlockBody::Button { content, config } => (content.as_str(), None, Some(config)),
        };

    tx.execute(
        "INSERT INTO blocks (
            uuid,
            copy_uuid,
            session_uuid,
            sort_order,
            block_type,
            content,
            list_style,
            background_color,
            text_color,
            button_size,
            link
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
        params![
            block.id.to_string(),
            copy_uuid,
            session_uuid,
            sort_order,
            block.block_type().as_str(),
            content,
            list_style,
            config.and_then(|value| value.background_color.as_deref()),
            config.and_then(|value| value.text_color.as_deref()),
            config.map(|value| button_size_to_db(value.size)),
            config.and_then(|value| value.link.as_deref()),
        ],
    )?;

    if let BlockBody::List { items, .. } = &block.body {
        for (item_index, item) in items.iter().enumerate() {
            tx.execute(
                "INSERT INTO block_list_items (
                    copy_uuid,
                    session_uuid,
                    block_uuid,
                    sort_order,
                    content
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    copy_uuid,
                    session_uuid,
                    block.id.to_string(),
                    item_index as i64,
                    item.as_str(),
                ],
            )?;
        }
    }

    Ok(())
}

fn load_sessions(conn: &Connection, copy_uuid: &str) -> RepoResult<Vec<Session>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, title
         FROM sessions
         WHERE copy_uuid = ?1
         ORDER BY sort_order ASC, uuid ASC;",
    )?;
    let mut rows = stmt.query([copy_uuid])?;
    let mut sessions = Vec::new();

    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        let session_id = parse_uuid(&uuid_text, "sessions.uuid")?;
        let title: String = row.get("title")?;

        let mut session = Session::with_id(session_id, title);
        session.blocks = load_blocks(conn, copy_uuid, &uuid_text)?;
        sessions.push(session);
    }

    Ok(sessions)
}

fn load_blocks(conn: &Connection, copy_uuid: &str, session_uuid: &str) -> RepoResult<Vec<Block>> {
    let mut stmt = conn.prepare(
        "SELECT
            uuid,
            block_type,
            content,
            list_style,
            background_color,
            text_color,
            button_size,
            link
         FROM blocks
         WHERE copy_uuid = ?1
           AND session_uuid = ?2
         ORDER BY sort_order ASC, uuid ASC;",
    )?;
    let mut rows = stmt.query(params![copy_uuid, session_uuid])?;
    let mut blocks = Vec::new();

    while let Some(row) = rows.next()? {
        blocks.push(parse_block_row(conn, copy_uuid, session_uuid, row)?);
    }

    Ok(blocks)
}

fn load_list_items(
    conn: &Connection,
    copy_uuid: &str,
    session_uuid: &str,
    block_uuid: &str,
) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT content
         FROM block_list_items
         WHERE copy_uuid = ?1
           AND session_uuid = ?2
           AND block_uuid = ?3
         ORDER BY sort_order ASC;",
    )?;
    let mut rows = stmt.query(params![copy_uuid, session_uuid, block_uuid])?;
    let mut items = Vec::new();

    while let Some(row) = rows.next()? {
        items.push(row.get(0)?);
    }

    Ok(items)
}

fn parse_copy_row(row: &Row<'_>) -> RepoResult<CopyDocument> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "copies.uuid")?;

    let workspace_text: String = row.get("workspace_uuid")?;
    let workspace_id = parse_uuid(&workspace_text, "copies.workspace_uuid")?;

    let type_text: String = row.get("copy_type")?;
    let copy_type = CopyType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid copy type `{type_text}` in copies.copy_type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = CopyStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in copies.status"))
    })?;

    Ok(CopyDocument {
        id,
        workspace_id,
        title: row.get("title")?,
        copy_type,
        sessions: Vec::new(),
        status,
        is_template: int_to_bool(row.get("is_template")?, "copies.is_template")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<CopySummary> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "copies.uuid")?;

    let workspace_text: String = row.get("workspace_uuid")?;
    let workspace_id = parse_uuid(&workspace_text, "copies.workspace_uuid")?;

    let type_text: String = row.get("copy_type")?;
    let copy_type = CopyType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid copy type `{type_text}` in copies.copy_type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = CopyStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in copies.status"))
    })?;

    Ok(CopySummary {
        id,
        workspace_id,
        title: row.get("title")?,
        copy_type,
        status,
        is_template: int_to_bool(row.get("is_template")?, "copies.is_template")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_block_row(
    conn: &Connection,
    copy_uuid: &str,
    session_uuid: &str,
    row: &Row<'_>,
) -> RepoResult<Block> {
    let uuid_text: String = row.get("uuid")?;
    let block_id = parse_uuid(&uuid_text, "blocks.uuid")?;

    let type_text: String = row.get("block_type")?;
    let block_type = BlockType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid block type `{type_text}` in blocks.block_type"
        ))
    })?;

    let content: String = row.get("content")?;

    let body = match block_type {
        BlockType::Text => BlockBody::Text { content },
        BlockType::Headline => BlockBody::Headline { content },
        BlockType::Subheadline => BlockBody::Subheadline { content },
        BlockType::List => {
            let style = match row.get::<_, Option<String>>("list_style")? {
                Some(value) => parse_list_style(&value).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid list style `{value}` in blocks.list_style"
                    ))
                })?,
                None => ListStyle::default(),
            };
            let items = load_list_items(conn, copy_uuid, session_uuid, &uuid_text)?;
            BlockBody::List { items, style }
        }
        BlockType::Button => {
            let size = match row.get::<_, Option<String>>("button_size")? {
                Some(value) => parse_button_size(&value).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid button size `{value}` in blocks.button_size"
                    ))
                })?,
                None => ButtonSize::default(),
            };
            BlockBody::Button {
                content,
                config: ButtonConfig {
                    background_color: row.get("background_color")?,
                    text_color: row.get("text_color")?,
                    size,
                    link: row.get("link")?,
                },
            }
        }
    };

    Ok(Block::with_id(block_id, body))
}

fn list_style_to_db(style: ListStyle) -> &'static str {
    match style {
        ListStyle::Bullet => "bullet",
        ListStyle::Numbered => "numbered",
    }
}

fn parse_list_style(value: &str) -> Option<ListStyle> {
    match value {
        "bullet" => Some(ListStyle::Bullet),
        "numbered" => Some(ListStyle::Numbered),
        _ => None,
    }
}

fn button_size_to_db(size: ButtonSize) -> &'static str {
    match size {
        ButtonSize::Small => "small",
        ButtonSize::Medium => "medium",
        ButtonSize::Large => "large",
    }
}

fn parse_button_size(value: &str) -> Option<ButtonSize> {
    match value {
        "small" => Some(ButtonSize::Small),
        "medium" => Some(ButtonSize::Medium),
        "large" => Some(ButtonSize::Large),
        _ => None,
    }
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn ensure_copy_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["copies", "sessions", "blocks", "block_list_items"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in [
        "uuid",
        "workspace_uuid",
        "title",
        "copy_type",
        "status",
        "is_template",
        "created_by",
        "created_at",
        "updated_at",
    ] {
        if !table_has_column(conn, "copies", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "copies",
                column,
            });
        }
    }

    for column in ["uuid", "copy_uuid", "title", "sort_order"] {
        if !table_has_column(conn, "sessions", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "sessions",
                column,
            });
        }
    }

    for column in [
        "uuid",
        "copy_uuid",
        "session_uuid",
        "sort_order",
        "block_type",
        "content",
        "list_style",
        "background_color",
        "text_color",
        "button_size",
        "link",
    ] {
        if !table_has_column(conn, "blocks", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "blocks",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
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

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
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
