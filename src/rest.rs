//! Client for the hosted `vaccination_submissions` table behind a
//! PostgREST-style API.

use crate::errors::StoreError;
use crate::models::{NewSubmission, RecordId, SubmissionRecord, Vaccine};
use crate::store::SubmissionStore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_TABLE: &str = "vaccination_submissions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project URL, e.g. `https://example.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    pub table: String,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}

pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn select_by_vaccine(&self, vaccine: Vaccine) -> RequestBuilder {
        self.authorized(self.client.get(self.config.table_url())).query(&[
            ("select", "*".to_string()),
            ("vaccine", format!("eq.{vaccine}")),
            ("order", "created_at.desc".to_string()),
        ])
    }

    async fn rows<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, StoreError> {
        let response = checked(request.send().await?).await?;
        Ok(response.json::<Vec<T>>().await?)
    }
}

async fn checked(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SubmissionStore for RestStore {
    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        let submission = submission.resolved();
        debug!(vaccine = %submission.vaccine, "inserting submission");
        let request = self
            .authorized(self.client.post(self.config.table_url()))
            .header("Prefer", "return=representation")
            .json(&submission);
        Self::rows::<SubmissionRecord>(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    async fn list_by_vaccine(&self, vaccine: Vaccine) -> Result<Vec<SubmissionRecord>, StoreError> {
        debug!(%vaccine, "listing submissions");
        Self::rows(self.select_by_vaccine(vaccine)).await
    }

    async fn latest_by_vaccine(
        &self,
        vaccine: Vaccine,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        debug!(%vaccine, "fetching latest submission");
        let request = self.select_by_vaccine(vaccine).query(&[("limit", "1")]);
        Ok(Self::rows(request).await?.into_iter().next())
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<bool, StoreError> {
        debug!(%id, "deleting submission");
        let request = self
            .authorized(self.client.delete(self.config.table_url()))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}")), ("select", "id".to_string())]);
        let deleted: Vec<serde_json::Value> = Self::rows(request).await?;
        Ok(!deleted.is_empty())
    }
}
