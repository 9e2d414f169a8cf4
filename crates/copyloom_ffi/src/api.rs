//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for early-stage UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Rich payloads cross the bridge as JSON strings; envelopes carry
//!   plain fields only.

use copyloom_core::db::open_db;
use copyloom_core::{
    core_version as core_version_inner, deliver_best_effort, display_name as display_name_inner,
    export_block_text, extract_block_text as extract_block_text_inner, icon as icon_inner,
    init_logging as init_logging_inner, ping as ping_inner, tier_of, BlockBody, CopyDocument,
    CopyListQuery, CopyService, CopyServiceError, CopyStatus, CopyType, LogNotificationSink,
    ModelSwitchNotifier, NewCopy, RoutingRepoResult, SqliteCopyRepository, SqliteRoutingStore,
    SystemClipboard,
};
use log::{error, info};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

const COPY_LIST_DEFAULT_LIMIT: u32 = 50;
const COPY_LIST_LIMIT_MAX: u32 = 200;
const DB_FILE_NAME: &str = "copyloom.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static MODEL_SESSIONS: OnceLock<Mutex<HashMap<String, ModelSwitchNotifier>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Extracts the plain text of one block.
///
/// Input is a JSON-encoded block body (the editor's wire form). Markup
/// blocks go through the HTML-to-text scanner; list blocks become
/// bulleted lines.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never throws; unparseable input extracts to the empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn extract_block_text(block_json: String) -> String {
    match serde_json::from_str::<BlockBody>(&block_json) {
        Ok(body) => extract_block_text_inner(&body),
        Err(_) => String::new(),
    }
}

/// Extracts one block's plain text and writes it to the system clipboard.
///
/// # FFI contract
/// - Sync call; talks to the platform clipboard service.
/// - Never throws; returns `true` only when text was actually written.
/// - Blank extractions and unparseable input skip the write and return
///   `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn export_block_to_clipboard(block_json: String) -> bool {
    let Ok(body) = serde_json::from_str::<BlockBody>(&block_json) else {
        info!("event=clipboard_export module=ffi status=skipped reason=unparsed_block");
        return false;
    };
    let mut clipboard = match SystemClipboard::try_new() {
        Ok(clipboard) => clipboard,
        Err(err) => {
            error!(
                "event=clipboard_export module=ffi status=error error_code=clipboard_unavailable error={err}"
            );
            return false;
        }
    };
    export_block_text(&mut clipboard, &body)
}

/// Model switch notice mirrored for the Dart toast layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNotice {
    /// Identifier of the model switched to.
    pub model_id: String,
    /// Resolved display name.
    pub display_name: String,
    /// Tier label (`flagship|economy`).
    pub tier: String,
    /// Glyph matching the tier.
    pub icon: String,
    /// Whether the system picked this model rather than the user.
    pub auto_routed: bool,
    /// Complete message ready for display.
    pub message: String,
}

/// Records one model selection for an editing session.
///
/// Returns a notice only when the session's model identifier changed;
/// the first observation of a session and repeats stay silent. Each
/// emitted notice is also written to the application log.
///
/// # FFI contract
/// - Sync call; in-process state only, reset on restart.
/// - `session_token` scopes the state; one editor session, one token.
/// - Never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn model_observe(
    session_token: String,
    model_id: String,
    auto_routed: bool,
) -> Option<ModelNotice> {
    let mut sessions = lock_model_sessions();
    let notifier = sessions.entry(session_token).or_default();
    let notice = notifier.observe(&model_id, auto_routed)?;
    deliver_best_effort(&mut LogNotificationSink, &notice);

    Some(ModelNotice {
        model_id: notice.model_id,
        display_name: notice.display_name,
        tier: notice.tier.as_str().to_string(),
        icon: notice.icon,
        auto_routed: notice.auto_routed,
        message: notice.message,
    })
}

/// Drops the switch-tracking state of one editing session.
///
/// # FFI contract
/// - Sync call; never throws.
/// - Unknown tokens are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn model_end_session(session_token: String) {
    lock_model_sessions().remove(&session_token);
}

/// Resolves the display name for a model identifier.
///
/// # FFI contract
/// - Sync call, pure computation, never throws.
/// - Unrecognized identifiers return the raw identifier.
#[flutter_rust_bridge::frb(sync)]
pub fn model_display_name(model_id: String) -> String {
    display_name_inner(&model_id)
}

/// Classifies a model identifier (`flagship|economy`).
///
/// # FFI contract
/// - Sync call, pure computation, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn model_tier(model_id: String) -> String {
    tier_of(&model_id).as_str().to_string()
}

/// Returns the tier glyph for a model identifier.
///
/// # FFI contract
/// - Sync call, pure computation, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn model_icon(model_id: String) -> String {
    icon_inner(&model_id).to_string()
}

/// Routing row mirrored for the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfigItem {
    /// Copy type label (`ad|email|...`).
    pub copy_type: String,
    /// Model used when the user does not pick one.
    pub default_model: String,
    /// Selectable models in display order.
    pub available_models: Vec<String>,
    /// Short description shown under the row.
    pub description: String,
    /// Epoch ms of the last default change.
    pub updated_at: i64,
}

/// Routing list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingListResponse {
    /// Whether the read succeeded.
    pub ok: bool,
    /// Rows sorted by copy type (empty on failure).
    pub configs: Vec<RoutingConfigItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Routing update envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingUpdateResponse {
    /// Whether the update was persisted.
    pub ok: bool,
    /// Stored row after the update (None on failure).
    pub config: Option<RoutingConfigItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Lists every routing config sorted by copy type.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures come back in the envelope.
#[flutter_rust_bridge::frb(sync)]
pub fn routing_list_configs() -> RoutingListResponse {
    match with_routing_store(|store| store.list_configs()) {
        Ok(configs) => RoutingListResponse {
            ok: true,
            configs: configs.into_iter().map(to_routing_item).collect(),
            message: "OK".to_string(),
        },
        Err(err) => RoutingListResponse {
            ok: false,
            configs: Vec::new(),
            message: format!("routing_list_configs failed: {err}"),
        },
    }
}

/// Sets the default model for one copy type.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - The default must be one of the row's available models.
/// - Never panics; returns the stored row on success.
#[flutter_rust_bridge::frb(sync)]
pub fn routing_update_default(copy_type: String, model_id: String) -> RoutingUpdateResponse {
    let Some(copy_type) = CopyType::parse(&copy_type) else {
        return RoutingUpdateResponse {
            ok: false,
            config: None,
            message: format!("routing_update_default failed: unknown copy type `{copy_type}`"),
        };
    };

    match with_routing_store(|store| store.update_default_model(copy_type, &model_id)) {
        Ok(config) => RoutingUpdateResponse {
            ok: true,
            config: Some(to_routing_item(config)),
            message: "Default model updated.".to_string(),
        },
        Err(err) => RoutingUpdateResponse {
            ok: false,
            config: None,
            message: format!("routing_update_default failed: {err}"),
        },
    }
}

/// Copy summary row mirrored for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySummaryItem {
    /// Stable copy ID in string form.
    pub copy_id: String,
    /// Owning workspace ID in string form.
    pub workspace_id: String,
    /// User-facing title.
    pub title: String,
    /// Copy type label.
    pub copy_type: String,
    /// Status label (`draft|published`).
    pub status: String,
    /// Whether the copy is a reusable template.
    pub is_template: bool,
    /// Epoch ms of the last change.
    pub updated_at: i64,
}

/// Copy list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyListResponse {
    /// Summary rows, newest first (empty on failure).
    pub items: Vec<CopySummaryItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Effective applied list limit.
    pub applied_limit: u32,
}

/// Generic action response envelope for copy command flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Optional affected copy ID.
    pub copy_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CopyActionResponse {
    fn success(message: impl Into<String>, copy_id: String) -> Self {
        Self {
            ok: true,
            copy_id: Some(copy_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            copy_id: None,
            message: message.into(),
        }
    }
}

/// Full-document envelope; the session tree crosses as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyDocumentResponse {
    /// Whether the read succeeded.
    pub ok: bool,
    /// JSON-encoded `CopyDocument` (None on failure).
    pub copy_json: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Creates an empty draft copy.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns the created copy ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_create(
    workspace_id: String,
    title: String,
    copy_type: String,
    is_template: bool,
    created_by: Option<String>,
) -> CopyActionResponse {
    let workspace_id = match parse_uuid_arg(&workspace_id, "workspace_id") {
        Ok(id) => id,
        Err(message) => return CopyActionResponse::failure(message),
    };
    let Some(copy_type) = CopyType::parse(&copy_type) else {
        return CopyActionResponse::failure(format!(
            "copy_create failed: unknown copy type `{copy_type}`"
        ));
    };

    let request = NewCopy {
        workspace_id,
        title: title.trim().to_string(),
        copy_type,
        is_template,
        created_by,
    };
    match with_copy_service(|service| service.create_copy(&request)) {
        Ok(copy) => CopyActionResponse::success("Copy created.", copy.id.to_string()),
        Err(err) => CopyActionResponse::failure(format!("copy_create failed: {err}")),
    }
}

/// Lists copy summaries, newest first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_list(
    workspace_id: Option<String>,
    copy_type: Option<String>,
    is_template: Option<bool>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> CopyListResponse {
    let applied_limit = normalize_list_limit(limit);

    let workspace = match workspace_id {
        Some(raw) => match parse_uuid_arg(&raw, "workspace_id") {
            Ok(id) => Some(id),
            Err(message) => {
                return CopyListResponse {
                    items: Vec::new(),
                    message,
                    applied_limit,
                }
            }
        },
        None => None,
    };
    let copy_type = match copy_type {
        Some(raw) => match CopyType::parse(&raw) {
            Some(parsed) => Some(parsed),
            None => {
                return CopyListResponse {
                    items: Vec::new(),
                    message: format!("copy_list failed: unknown copy type `{raw}`"),
                    applied_limit,
                }
            }
        },
        None => None,
    };

    let query = CopyListQuery {
        workspace,
        copy_type,
        is_template,
        limit: Some(applied_limit),
        offset: offset.unwrap_or(0),
    };
    match with_copy_service(|service| service.list_copies(&query)) {
        Ok(summaries) => {
            let items: Vec<_> = summaries.into_iter().map(to_summary_item).collect();
            let message = if items.is_empty() {
                "No copies.".to_string()
            } else {
                format!("Found {} cop(ies).", items.len())
            };
            CopyListResponse {
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => CopyListResponse {
            items: Vec::new(),
            message: format!("copy_list failed: {err}"),
            applied_limit,
        },
    }
}

/// Loads one copy with its full session tree as JSON.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; missing copies report `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_get_json(copy_id: String) -> CopyDocumentResponse {
    let id = match parse_uuid_arg(&copy_id, "copy_id") {
        Ok(id) => id,
        Err(message) => {
            return CopyDocumentResponse {
                ok: false,
                copy_json: None,
                message,
            }
        }
    };

    match with_copy_service(|service| service.get_copy(id)) {
        Ok(Some(copy)) => match serde_json::to_string(&copy) {
            Ok(json) => CopyDocumentResponse {
                ok: true,
                copy_json: Some(json),
                message: "OK".to_string(),
            },
            Err(err) => CopyDocumentResponse {
                ok: false,
                copy_json: None,
                message: format!("copy_get failed: {err}"),
            },
        },
        Ok(None) => CopyDocumentResponse {
            ok: false,
            copy_json: None,
            message: "Copy not found.".to_string(),
        },
        Err(err) => CopyDocumentResponse {
            ok: false,
            copy_json: None,
            message: format!("copy_get failed: {err}"),
        },
    }
}

/// Replaces one copy's metadata and session tree from JSON.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Full replacement semantics for the session tree.
/// - Never panics; returns the saved copy ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_save_json(copy_json: String) -> CopyActionResponse {
    let copy = match serde_json::from_str::<CopyDocument>(&copy_json) {
        Ok(copy) => copy,
        Err(err) => {
            return CopyActionResponse::failure(format!(
                "copy_save failed: invalid document JSON: {err}"
            ))
        }
    };

    match with_copy_service(|service| service.save_copy(&copy)) {
        Ok(saved) => CopyActionResponse::success("Copy saved.", saved.id.to_string()),
        Err(err) => CopyActionResponse::failure(format!("copy_save failed: {err}")),
    }
}

/// Moves one copy between lifecycle states (`draft|published`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_set_status(copy_id: String, status: String) -> CopyActionResponse {
    let id = match parse_uuid_arg(&copy_id, "copy_id") {
        Ok(id) => id,
        Err(message) => return CopyActionResponse::failure(message),
    };
    let Some(status) = CopyStatus::parse(&status) else {
        return CopyActionResponse::failure(format!(
            "copy_set_status failed: unknown status `{status}`"
        ));
    };

    match with_copy_service(|service| service.set_status(id, status)) {
        Ok(copy) => CopyActionResponse::success("Status updated.", copy.id.to_string()),
        Err(err) => CopyActionResponse::failure(format!("copy_set_status failed: {err}")),
    }
}

/// Hard-deletes one copy with its sessions and blocks.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_delete(copy_id: String) -> CopyActionResponse {
    let id = match parse_uuid_arg(&copy_id, "copy_id") {
        Ok(id) => id,
        Err(message) => return CopyActionResponse::failure(message),
    };

    match with_copy_service(|service| service.delete_copy(id).map(|()| id)) {
        Ok(id) => CopyActionResponse::success("Copy deleted.", id.to_string()),
        Err(err) => CopyActionResponse::failure(format!("copy_delete failed: {err}")),
    }
}

/// Instantiates a template into a fresh draft copy.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Session and block IDs are regenerated; the clone starts as a draft.
/// - Never panics; returns the new copy ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn copy_from_template(
    template_id: String,
    workspace_id: String,
    title: Option<String>,
    created_by: Option<String>,
) -> CopyActionResponse {
    let template_id = match parse_uuid_arg(&template_id, "template_id") {
        Ok(id) => id,
        Err(message) => return CopyActionResponse::failure(message),
    };
    let workspace_id = match parse_uuid_arg(&workspace_id, "workspace_id") {
        Ok(id) => id,
        Err(message) => return CopyActionResponse::failure(message),
    };

    match with_copy_service(|service| {
        service.create_from_template(template_id, workspace_id, title, created_by)
    }) {
        Ok(copy) => CopyActionResponse::success("Copy created from template.", copy.id.to_string()),
        Err(err) => CopyActionResponse::failure(format!("copy_from_template failed: {err}")),
    }
}

fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => COPY_LIST_DEFAULT_LIMIT,
        Some(value) if value > COPY_LIST_LIMIT_MAX => COPY_LIST_LIMIT_MAX,
        Some(value) => value,
        None => COPY_LIST_DEFAULT_LIMIT,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("COPYLOOM_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn lock_model_sessions() -> std::sync::MutexGuard<'static, HashMap<String, ModelSwitchNotifier>> {
    MODEL_SESSIONS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_copy_service<T>(
    f: impl FnOnce(&CopyService<SqliteCopyRepository<'_>>) -> Result<T, CopyServiceError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("copy DB open failed: {err}"))?;
    let repo = SqliteCopyRepository::try_new(&conn)
        .map_err(|err| format!("copy repo init failed: {err}"))?;
    let service = CopyService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn with_routing_store<T>(
    f: impl FnOnce(&SqliteRoutingStore<'_>) -> RoutingRepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("routing DB open failed: {err}"))?;
    let store = SqliteRoutingStore::try_new(&conn)
        .map_err(|err| format!("routing store init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn parse_uuid_arg(value: &str, what: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid {what}: `{value}`"))
}

fn to_routing_item(config: copyloom_core::RoutingConfig) -> RoutingConfigItem {
    RoutingConfigItem {
        copy_type: config.copy_type.as_str().to_string(),
        default_model: config.default_model,
        available_models: config.available_models,
        description: config.description,
        updated_at: config.updated_at,
    }
}

fn to_summary_item(summary: copyloom_core::CopySummary) -> CopySummaryItem {
    CopySummaryItem {
        copy_id: summary.id.to_string(),
        workspace_id: summary.workspace_id.to_string(),
        title: summary.title,
        copy_type: summary.copy_type.as_str().to_string(),
        status: summary.status.as_str().to_string(),
        is_template: summary.is_template,
        updated_at: summary.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        copy_create, copy_delete, copy_from_template, copy_get_json, copy_list, copy_save_json,
        copy_set_status, core_version, extract_block_text, init_logging, model_display_name,
        model_end_session, model_icon, model_observe, model_tier, ping, routing_list_configs,
        routing_update_default,
    };
    use copyloom_core::db::open_db;
    use copyloom_core::CopyDocument;
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn extract_block_text_handles_wire_form_and_garbage() {
        let text = extract_block_text(
            r#"{"type": "text", "content": "<p>Hello<br>World</p>"}"#.to_string(),
        );
        assert_eq!(text, "Hello\nWorld");

        let list = extract_block_text(
            r#"{"type": "list", "content": ["Buy now", "  ", "Save 20%"]}"#.to_string(),
        );
        assert_eq!(list, "\u{2022} Buy now\n\u{2022} Save 20%");

        assert_eq!(extract_block_text("not json".to_string()), "");
    }

    #[test]
    fn copy_create_and_get_roundtrip() {
        let workspace = Uuid::new_v4().to_string();
        let created = copy_create(
            workspace.clone(),
            "FFI roundtrip".to_string(),
            "email".to_string(),
            false,
            Some("user-1".to_string()),
        );
        assert!(created.ok, "{}", created.message);
        let copy_id = created.copy_id.clone().expect("create should return id");

        let fetched = copy_get_json(copy_id.clone());
        assert!(fetched.ok, "{}", fetched.message);
        let copy: CopyDocument =
            serde_json::from_str(&fetched.copy_json.expect("copy json")).expect("valid json");
        assert_eq!(copy.id.to_string(), copy_id);
        assert_eq!(copy.title, "FFI roundtrip");
        assert!(copy.created_at > 0);
    }

    #[test]
    fn copy_create_rejects_unknown_copy_type() {
        let response = copy_create(
            Uuid::new_v4().to_string(),
            "Bad type".to_string(),
            "blog_post".to_string(),
            false,
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("unknown copy type"));
    }

    #[test]
    fn copy_save_roundtrips_edited_document() {
        let workspace = Uuid::new_v4().to_string();
        let created = copy_create(
            workspace,
            "Before edit".to_string(),
            "ad".to_string(),
            false,
            None,
        );
        assert!(created.ok, "{}", created.message);
        let copy_id = created.copy_id.expect("create should return id");

        let fetched = copy_get_json(copy_id.clone());
        let mut copy: CopyDocument =
            serde_json::from_str(&fetched.copy_json.expect("copy json")).expect("valid json");
        copy.title = "After edit".to_string();

        let saved = copy_save_json(serde_json::to_string(&copy).expect("serialize"));
        assert!(saved.ok, "{}", saved.message);

        let reloaded = copy_get_json(copy_id);
        let copy: CopyDocument =
            serde_json::from_str(&reloaded.copy_json.expect("copy json")).expect("valid json");
        assert_eq!(copy.title, "After edit");
    }

    #[test]
    fn copy_list_normalizes_limit_and_filters_by_workspace() {
        let workspace = Uuid::new_v4().to_string();
        let created = copy_create(
            workspace.clone(),
            "Listed".to_string(),
            "social_post".to_string(),
            false,
            None,
        );
        assert!(created.ok, "{}", created.message);
        let created_id = created.copy_id.expect("create should return id");

        let response = copy_list(Some(workspace), None, None, Some(999), None);
        assert_eq!(response.applied_limit, 200);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].copy_id, created_id);
    }

    #[test]
    fn copy_status_and_delete_flow() {
        let workspace = Uuid::new_v4().to_string();
        let created = copy_create(
            workspace,
            "Lifecycle".to_string(),
            "ad".to_string(),
            false,
            None,
        );
        assert!(created.ok, "{}", created.message);
        let copy_id = created.copy_id.expect("create should return id");

        let published = copy_set_status(copy_id.clone(), "published".to_string());
        assert!(published.ok, "{}", published.message);

        let conn = open_entry_conn();
        let status: String = conn
            .query_row(
                "SELECT status FROM copies WHERE uuid = ?1",
                [copy_id.as_str()],
                |row| row.get(0),
            )
            .expect("query status row");
        assert_eq!(status, "published");
        drop(conn);

        let deleted = copy_delete(copy_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let fetched = copy_get_json(copy_id);
        assert!(!fetched.ok);
    }

    #[test]
    fn copy_from_template_requires_template_flag() {
        let workspace = Uuid::new_v4().to_string();
        let plain = copy_create(
            workspace.clone(),
            "Plain".to_string(),
            "email".to_string(),
            false,
            None,
        );
        assert!(plain.ok, "{}", plain.message);

        let response = copy_from_template(
            plain.copy_id.expect("create should return id"),
            workspace.clone(),
            None,
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("not a template"));

        let template = copy_create(
            workspace.clone(),
            "Template".to_string(),
            "email".to_string(),
            true,
            None,
        );
        assert!(template.ok, "{}", template.message);
        let instantiated = copy_from_template(
            template.copy_id.expect("create should return id"),
            workspace,
            Some("Instance".to_string()),
            None,
        );
        assert!(instantiated.ok, "{}", instantiated.message);
    }

    #[test]
    fn routing_list_exposes_seeded_rows() {
        let response = routing_list_configs();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.configs.len(), 5);
        for config in &response.configs {
            assert!(config.available_models.contains(&config.default_model));
        }
    }

    #[test]
    fn routing_update_rejects_unavailable_model() {
        let response = routing_update_default("ad".to_string(), "openai/gpt-4".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("not available"));

        let unknown = routing_update_default("poem".to_string(), "openai/gpt-5".to_string());
        assert!(!unknown.ok);
        assert!(unknown.message.contains("unknown copy type"));
    }

    #[test]
    fn routing_update_persists_valid_default() {
        let response =
            routing_update_default("landing_page".to_string(), "openai/gpt-5".to_string());
        assert!(response.ok, "{}", response.message);
        let config = response.config.expect("updated config");
        assert_eq!(config.default_model, "openai/gpt-5");

        let listed = routing_list_configs();
        let row = listed
            .configs
            .iter()
            .find(|config| config.copy_type == "landing_page")
            .expect("landing_page row");
        assert_eq!(row.default_model, "openai/gpt-5");
    }

    #[test]
    fn model_observe_notifies_once_per_switch() {
        let token = unique_token("model-observe");

        assert!(model_observe(token.clone(), "openai/gpt-5-mini".to_string(), true).is_none());
        assert!(model_observe(token.clone(), "openai/gpt-5-mini".to_string(), true).is_none());

        let notice = model_observe(token.clone(), "openai/gpt-5".to_string(), false)
            .expect("switch should notify");
        assert_eq!(notice.display_name, "GPT-5");
        assert_eq!(notice.tier, "flagship");
        assert!(!notice.auto_routed);

        assert!(model_observe(token.clone(), "openai/gpt-5".to_string(), false).is_none());

        // Ending the session clears the state; the next observation is first again.
        model_end_session(token.clone());
        assert!(model_observe(token, "openai/gpt-5-mini".to_string(), true).is_none());
    }

    #[test]
    fn model_metadata_lookups_never_fail() {
        assert_eq!(model_display_name("openai/gpt-5".to_string()), "GPT-5");
        assert_eq!(
            model_display_name("vendor/unheard-of".to_string()),
            "vendor/unheard-of"
        );
        assert_eq!(model_tier("google/gemini-2.5-flash".to_string()), "economy");
        assert_eq!(model_icon("openai/gpt-5".to_string()), "\u{2726}");
    }

    fn open_entry_conn() -> rusqlite::Connection {
        open_db(super::resolve_db_path()).expect("open db")
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
