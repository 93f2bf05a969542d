// Repository trait for security event aggregates
use crate::domain::dataset::{Dataset, ReportSection};
use crate::domain::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Run the aggregate query behind a report section and return its rows
    /// in result-set order
    async fn fetch(&self, section: ReportSection) -> Result<Dataset>;
}
