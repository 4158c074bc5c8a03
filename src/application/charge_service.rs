// Charge service - Use cases for recording and managing sessions
use crate::application::charge_repository::ChargeRepository;
use crate::domain::charge::{ChargeDraft, ChargeRecord};
use crate::domain::error::ChargeLogError;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChargeService {
    repository: Arc<dyn ChargeRepository>,
}

impl ChargeService {
    pub fn new(repository: Arc<dyn ChargeRepository>) -> Self {
        Self { repository }
    }

    /// Validate and persist a submitted session. Ids are UUIDs rather than
    /// creation timestamps, so two submissions in the same millisecond cannot
    /// collide.
    pub async fn create(&self, draft: ChargeDraft) -> Result<ChargeRecord, ChargeLogError> {
        draft.validate()?;
        let record = draft.into_record(Uuid::new_v4().to_string(), Utc::now());
        self.repository
            .create(record)
            .await
            .map_err(ChargeLogError::Store)
    }

    pub async fn list(&self) -> Result<Vec<ChargeRecord>, ChargeLogError> {
        self.repository.list().await.map_err(ChargeLogError::Store)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ChargeLogError> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(ChargeLogError::Store)?;
        if removed {
            Ok(())
        } else {
            Err(ChargeLogError::NotFound(id.to_string()))
        }
    }

    pub async fn delete_all(&self) -> Result<usize, ChargeLogError> {
        self.repository
            .delete_all()
            .await
            .map_err(ChargeLogError::Store)
    }

    /// The full record set as an indented JSON snapshot, plus a dated
    /// download filename. Re-importing the snapshot verbatim reproduces an
    /// identical record set.
    pub async fn export_snapshot(&self) -> Result<(String, String), ChargeLogError> {
        let records = self.list().await?;
        let body = serde_json::to_string_pretty(&records)
            .map_err(|e| ChargeLogError::Store(e.into()))?;
        let filename = format!("ev-charging-data-{}.json", Utc::now().date_naive());
        Ok((filename, body))
    }
}
