//! Submission store capability set.
//!
//! Each call is one round trip with no caching or retry. Two backends
//! implement it: [`RestStore`](crate::rest::RestStore) for the hosted table and
//! [`FileStore`](crate::storage::FileStore) for a local JSON file.

use crate::config::StoreBackend;
use crate::errors::StoreError;
use crate::models::{NewSubmission, RecordId, SubmissionRecord, Vaccine};
use crate::rest::RestStore;
use crate::storage::FileStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

pub type SharedStore = Arc<dyn SubmissionStore>;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Creates one row and returns it as stored.
    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError>;

    /// All rows for `vaccine`, newest `created_at` first.
    async fn list_by_vaccine(&self, vaccine: Vaccine) -> Result<Vec<SubmissionRecord>, StoreError>;

    async fn latest_by_vaccine(
        &self,
        vaccine: Vaccine,
    ) -> Result<Option<SubmissionRecord>, StoreError>;

    /// Returns whether a row was actually removed. A missing id is `Ok(false)`.
    async fn delete_by_id(&self, id: &RecordId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<T: SubmissionStore + ?Sized> SubmissionStore for Arc<T> {
    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        (**self).insert(submission).await
    }

    async fn list_by_vaccine(&self, vaccine: Vaccine) -> Result<Vec<SubmissionRecord>, StoreError> {
        (**self).list_by_vaccine(vaccine).await
    }

    async fn latest_by_vaccine(
        &self,
        vaccine: Vaccine,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        (**self).latest_by_vaccine(vaccine).await
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<bool, StoreError> {
        (**self).delete_by_id(id).await
    }
}

pub async fn open_store(backend: &StoreBackend) -> Result<SharedStore, StoreError> {
    match backend {
        StoreBackend::Rest(config) => {
            info!("using hosted table {} at {}", config.table, config.base_url);
            Ok(Arc::new(RestStore::new(config.clone())?))
        }
        StoreBackend::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await?;
                }
            }
            info!("using local file store at {}", path.display());
            Ok(Arc::new(FileStore::open(path.clone()).await?))
        }
    }
}
