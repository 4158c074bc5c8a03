// Repository trait for charge record access
use crate::domain::charge::ChargeRecord;
use async_trait::async_trait;

#[async_trait]
pub trait ChargeRepository: Send + Sync {
    /// Full scan of the store. No ordering guarantee; callers sort.
    async fn list(&self) -> anyhow::Result<Vec<ChargeRecord>>;

    /// Persist one record verbatim. Records are never mutated afterwards.
    async fn create(&self, record: ChargeRecord) -> anyhow::Result<ChargeRecord>;

    /// Remove one record. Returns false when the id is unknown.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;

    /// Remove every record, returning how many were deleted.
    async fn delete_all(&self) -> anyhow::Result<usize>;
}
