//! Copy document use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/save/status/delete entry points for copies.
//! - Instantiate templates into fresh drafts with regenerated identity.
//!
//! # Invariants
//! - Write results are confirmed by read-back; storage owns timestamps.
//! - Template instantiation never reuses a template's session/block ids.
//! - Service APIs never bypass repository validation contracts.

use crate::model::block::Block;
use crate::model::copy::{CopyDocument, CopyId, CopyStatus, NewCopy, WorkspaceId};
use crate::model::session::Session;
use crate::repo::copy_repo::{CopyListQuery, CopyRepository, CopySummary, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for copy use-cases.
#[derive(Debug)]
pub enum CopyServiceError {
    /// Target copy does not exist.
    CopyNotFound(CopyId),
    /// Source copy exists but is not flagged as a template.
    NotATemplate(CopyId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CopyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CopyNotFound(id) => write!(f, "copy not found: {id}"),
            Self::NotATemplate(id) => write!(f, "copy is not a template: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent copy state: {details}"),
        }
    }
}

impl Error for CopyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CopyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CopyNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Copy service facade over repository implementations.
pub struct CopyService<R: CopyRepository> {
    repo: R,
}

impl<R: CopyRepository> CopyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty draft copy and returns the stored document.
    pub fn create_copy(&self, request: &NewCopy) -> Result<CopyDocument, CopyServiceError> {
        let mut copy = CopyDocument::new(
            request.workspace_id,
            request.title.clone(),
            request.copy_type,
        );
        copy.is_template = request.is_template;
        copy.created_by = request.created_by.clone();

        let id = self.repo.create_copy(&copy)?;
        self.repo.get_copy(id)?.ok_or(CopyServiceError::InconsistentState(
            "created copy not found in read-back",
        ))
    }

    /// Loads one copy with its full session tree.
    pub fn get_copy(&self, id: CopyId) -> Result<Option<CopyDocument>, CopyServiceError> {
        Ok(self.repo.get_copy(id)?)
    }

    /// Lists copy summaries sorted by `updated_at DESC, uuid ASC`.
    pub fn list_copies(&self, query: &CopyListQuery) -> Result<Vec<CopySummary>, CopyServiceError> {
        Ok(self.repo.list_copies(query)?)
    }

    /// Replaces a copy's content and returns the stored state.
    ///
    /// # Contract
    /// - Full replacement semantics for the session tree.
    /// - `updated_at` comes from storage, not from the caller's view.
    pub fn save_copy(&self, copy: &CopyDocument) -> Result<CopyDocument, CopyServiceError> {
        self.repo.save_copy(copy)?;
        self.repo
            .get_copy(copy.id)?
            .ok_or(CopyServiceError::InconsistentState(
                "saved copy not found in read-back",
            ))
    }

    /// Moves a copy between lifecycle states.
    pub fn set_status(
        &self,
        id: CopyId,
        status: CopyStatus,
    ) -> Result<CopyDocument, CopyServiceError> {
        self.repo.set_status(id, status)?;
        self.repo.get_copy(id)?.ok_or(CopyServiceError::InconsistentState(
            "status change not found in read-back",
        ))
    }

    /// Hard-deletes a copy with its sessions and blocks.
    pub fn delete_copy(&self, id: CopyId) -> Result<(), CopyServiceError> {
        Ok(self.repo.delete_copy(id)?)
    }

    /// Instantiates a template into a fresh draft copy.
    ///
    /// # Contract
    /// - Source must have `is_template = true`.
    /// - Copy/session/block ids are all regenerated.
    /// - The clone starts as a draft with the template flag cleared.
    pub fn create_from_template(
        &self,
        template_id: CopyId,
        workspace_id: WorkspaceId,
        title: Option<String>,
        created_by: Option<String>,
    ) -> Result<CopyDocument, CopyServiceError> {
        let template = self
            .repo
            .get_copy(template_id)?
            .ok_or(CopyServiceError::CopyNotFound(template_id))?;
        if !template.is_template {
            return Err(CopyServiceError::NotATemplate(template_id));
        }

        let mut copy = CopyDocument::new(
            workspace_id,
            title.unwrap_or_else(|| template.title.clone()),
            template.copy_type,
        );
        copy.created_by = created_by;
        copy.sessions = template
            .sessions
            .iter()
            .map(clone_session_with_new_ids)
            .collect();

        let id = self.repo.create_copy(&copy)?;
        self.repo.get_copy(id)?.ok_or(CopyServiceError::InconsistentState(
            "instantiated copy not found in read-back",
        ))
    }
}

fn clone_session_with_new_ids(session: &Session) -> Session {
    let mut clone = Session::new(session.title.clone());
    clone.blocks = session
        .blocks
        .iter()
        .map(|block| Block::new(block.body.clone()))
        .collect();
    clone
}
