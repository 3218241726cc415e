use crate::errors::StoreError;
use crate::models::{NewSubmission, RecordId, SubmissionRecord, Vaccine};
use crate::store::SubmissionStore;
use async_trait::async_trait;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// On-disk layout. Rows are kept in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    pub next_id: u64,
    pub rows: Vec<SubmissionRecord>,
}

/// Submission table kept in a local JSON file, rewritten after every change.
pub struct FileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl FileStore {
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let data = load_data(&path).await?;
        info!("loaded {} submissions from {}", data.rows.len(), path.display());
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }
}

pub async fn load_data(path: &Path) -> Result<StoreData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

fn newest_first(data: &StoreData, vaccine: Vaccine) -> impl Iterator<Item = &SubmissionRecord> {
    data.rows.iter().rev().filter(move |row| row.vaccine == vaccine)
}

#[async_trait]
impl SubmissionStore for FileStore {
    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        let submission = submission.resolved();
        let mut data = self.data.lock().await;
        data.next_id += 1;
        let record = SubmissionRecord {
            id: RecordId::new(data.next_id.to_string()),
            vaccine: submission.vaccine,
            staff_count: submission.staff_count,
            resident_count: submission.resident_count,
            note: submission.note,
            date_submitted: submission
                .date_submitted
                .unwrap_or_else(|| Local::now().date_naive()),
            created_at: Some(Utc::now()),
        };
        data.rows.push(record.clone());

        if let Err(err) = persist_data(&self.path, &data).await {
            data.rows.pop();
            data.next_id -= 1;
            return Err(err);
        }
        debug!(id = %record.id, "stored submission");
        Ok(record)
    }

    async fn list_by_vaccine(&self, vaccine: Vaccine) -> Result<Vec<SubmissionRecord>, StoreError> {
        let data = self.data.lock().await;
        Ok(newest_first(&data, vaccine).cloned().collect())
    }

    async fn latest_by_vaccine(
        &self,
        vaccine: Vaccine,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        let data = self.data.lock().await;
        Ok(newest_first(&data, vaccine).next().cloned())
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut data = self.data.lock().await;
        let Some(index) = data.rows.iter().position(|row| &row.id == id) else {
            return Ok(false);
        };
        let removed = data.rows.remove(index);

        if let Err(err) = persist_data(&self.path, &data).await {
            data.rows.insert(index, removed);
            return Err(err);
        }
        Ok(true)
    }
}
