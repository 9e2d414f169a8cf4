//! Routing configuration use-case service.
//!
//! # Responsibility
//! - Serve routing configs from a per-instance cache.
//! - Apply default-model updates and keep reads consistent afterwards.
//! - Pick the model for a generation request.
//!
//! # Invariants
//! - A successful update invalidates the cache; the next read hits
//!   storage (read-after-write within one process).
//! - A failed update leaves the cached view untouched.
//! - Explicit model requests pass through unchanged and are never
//!   flagged as auto-routed.

use crate::model::copy::CopyType;
use crate::repo::routing_repo::{RoutingConfig, RoutingRepoError, RoutingStore};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for routing use-cases.
#[derive(Debug)]
pub enum RoutingServiceError {
    /// No routing row exists for the copy type.
    ConfigNotFound(CopyType),
    /// Requested default model is outside the available set.
    ModelNotAvailable {
        copy_type: CopyType,
        model_id: String,
    },
    /// Persistence-layer failure.
    Store(RoutingRepoError),
}

impl Display for RoutingServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
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
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoutingServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RoutingRepoError> for RoutingServiceError {
    fn from(value: RoutingRepoError) -> Self {
        match value {
            RoutingRepoError::ConfigNotFound(copy_type) => Self::ConfigNotFound(copy_type),
            RoutingRepoError::ModelNotAvailable {
                copy_type,
                model_id,
            } => Self::ModelNotAvailable {
                copy_type,
                model_id,
            },
            other => Self::Store(other),
        }
    }
}

/// Outcome of a model selection for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedModel {
    pub model_id: String,
    /// True when the system picked the model instead of the user.
    pub auto_routed: bool,
}

/// Routing service facade with a per-instance config cache.
pub struct RoutingService<S: RoutingStore> {
    store: S,
    cache: Option<Vec<RoutingConfig>>,
}

impl<S: RoutingStore> RoutingService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store, cache: None }
    }

    /// Lists routing configs sorted by `copy_type ASC`, cached between
    /// updates.
    pub fn list_configs(&mut self) -> Result<Vec<RoutingConfig>, RoutingServiceError> {
        Ok(self.cached_configs()?.to_vec())
    }

    /// Loads one copy type's config through the same cache.
    pub fn get_config(
        &mut self,
        copy_type: CopyType,
    ) -> Result<Option<RoutingConfig>, RoutingServiceError> {
        let configs = self.cached_configs()?;
        Ok(configs
            .iter()
            .find(|config| config.copy_type == copy_type)
            .cloned())
    }

    /// Sets a copy type's default model and returns the stored record.
    ///
    /// # Contract
    /// - The store confirms the write before any cached view changes.
    /// - On success the cache is dropped so the next read hits storage.
    /// - On failure the cached view stays as it was.
    pub fn update_default_model(
        &mut self,
        copy_type: CopyType,
        model_id: &str,
    ) -> Result<RoutingConfig, RoutingServiceError> {
        let updated = match self.store.update_default_model(copy_type, model_id) {
            Ok(updated) => updated,
            Err(err) => {
                error!(
                    "event=routing_update module=routing status=error copy_type={copy_type} error_code=routing_update_failed error={err}"
                );
                return Err(err.into());
            }
        };

        self.cache = None;
        info!(
            "event=routing_update module=routing status=ok copy_type={} default_model={}",
            copy_type, updated.default_model
        );
        Ok(updated)
    }

    /// Picks the model for one generation request.
    ///
    /// An explicit request wins as-is. Without one, the copy type's
    /// default applies and the result is flagged auto-routed.
    pub fn select_model(
        &mut self,
        copy_type: CopyType,
        requested: Option<&str>,
    ) -> Result<SelectedModel, RoutingServiceError> {
        if let Some(model_id) = requested {
            return Ok(SelectedModel {
                model_id: model_id.to_string(),
                auto_routed: false,
            });
        }

        let config = self
            .get_config(copy_type)?
            .ok_or(RoutingServiceError::ConfigNotFound(copy_type))?;
        Ok(SelectedModel {
            model_id: config.default_model,
            auto_routed: true,
        })
    }

    fn cached_configs(&mut self) -> Result<&[RoutingConfig], RoutingServiceError> {
        if self.cache.is_none() {
            let configs = self.store.list_configs()?;
            info!(
                "event=routing_cache module=routing status=refreshed entries={}",
                configs.len()
            );
            self.cache = Some(configs);
        }
        Ok(self.cache.as_deref().unwrap_or_default())
    }
}
