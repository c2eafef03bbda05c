//! Matrix registry console: the system ontology manager.
//!
//! # Responsibility
//! - List the registry and create new matrices under the optimistic
//!   protocol.
//!
//! # Invariants
//! - Creation input is validated locally; a rejected draft never reaches
//!   the store.
//! - A failed creation removes the optimistic row again.

use crate::model::matrix::{Matrix, MatrixId, MatrixValidationError, NewMatrix};
use crate::repo::matrix_repo::MatrixRepository;
use crate::repo::{StoreError, StoreResult};
use crate::service::feed::{EventFeed, FeedLevel};
use crate::service::mirror::Mirror;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from registry console operations.
#[derive(Debug)]
pub enum MatrixServiceError {
    /// Draft rejected locally; no store call was made.
    Validation(MatrixValidationError),
    /// Store-level failure; local state has already been rolled back.
    Store(StoreError),
}

impl Display for MatrixServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MatrixServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<MatrixValidationError> for MatrixServiceError {
    fn from(value: MatrixValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for MatrixServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Registry console service.
pub struct MatrixService<R: MatrixRepository> {
    repo: R,
    mirror: Mirror<Matrix>,
}

impl<R: MatrixRepository> MatrixService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            mirror: Mirror::new(),
        }
    }

    /// Fetches the registry from the store.
    pub fn refresh(&mut self) -> StoreResult<()> {
        let matrices = self.repo.list_matrices()?;
        info!(
            "event=registry_sync module=matrix status=ok count={}",
            matrices.len()
        );
        self.mirror.replace_all(matrices);
        Ok(())
    }

    pub fn matrices(&self) -> &[Matrix] {
        self.mirror.items()
    }

    /// Registers a new matrix. The row joins the local registry
    /// optimistically; a store rejection (duplicate code) removes it
    /// again. Returns the client-generated id.
    pub fn create(
        &mut self,
        draft: NewMatrix,
        feed: &mut EventFeed,
    ) -> Result<MatrixId, MatrixServiceError> {
        if let Err(err) = draft.validate() {
            warn!("event=matrix_create module=matrix status=rejected code={}", draft.code);
            feed.push(
                FeedLevel::Error,
                "VALIDATION ERROR: CODE AND NAME REQUIRED".to_string(),
            );
            return Err(err.into());
        }

        let matrix = Matrix::from_draft(&draft);
        let id = matrix.uuid;
        let code = matrix.code.clone();
        let optimistic_row = matrix.clone();

        let repo = &self.repo;
        let result = self.mirror.apply_optimistic(
            |items| items.push(optimistic_row),
            || repo.create_matrix(&matrix),
        );

        match result {
            Ok(()) => {
                info!("event=matrix_create module=matrix status=ok code={code}");
                feed.push(
                    FeedLevel::Success,
                    format!("NEW MATRIX [{code}] INITIALIZED SUCCESSFULLY"),
                );
                Ok(id)
            }
            Err(err) => {
                error!("event=matrix_create module=matrix status=error code={code} error={err}");
                feed.push(
                    FeedLevel::Error,
                    "FATAL ERROR: COULD NOT WRITE TO REGISTRY".to_string(),
                );
                Err(err.into())
            }
        }
    }
}
