use analysis_core::{AnalysisError, LargeTransactionProvider, WhaleTransaction};
use async_trait::async_trait;

use crate::config::ProviderConfig;

/// Whale Alert feed for large on-chain transactions.
///
/// No API credential is wired up, so the feed reports no activity and
/// the whale dimension stays near its neutral baseline.
pub struct WhaleAlertClient {
    pub api_key: Option<String>,
}

impl WhaleAlertClient {
    pub fn new(_config: ProviderConfig) -> Self {
        Self { api_key: None }
    }
}

#[async_trait]
impl LargeTransactionProvider for WhaleAlertClient {
    async fn large_transactions(
        &self,
        _min_usd: f64,
    ) -> Result<Vec<WhaleTransaction>, AnalysisError> {
        if self.api_key.is_none() {
            tracing::debug!("no whale-alert credential configured");
            return Ok(Vec::new());
        }
        Ok(Vec::new())
    }
}
