use analysis_core::{AnalysisError, FilingsProvider, HoldingRecord, InsiderFiling};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderConfig;

const BASE_URL: &str = "https://data.sec.gov";

/// Ownership form types counted as insider activity
const INSIDER_FORMS: [&str; 3] = ["3", "4", "5"];

/// SEC EDGAR client for ownership filings.
///
/// Every failure path degrades to an empty list so a missing or
/// unreachable filing feed never blocks the pipeline.
pub struct SecFilingsClient {
    client: Client,
}

impl SecFilingsClient {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn get_submissions(&self, id: &str) -> Option<SubmissionsResponse> {
        let url = format!("{BASE_URL}/submissions/CIK{id}.json");
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("SEC request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("SEC returned HTTP {} for {url}", response.status());
            return None;
        }

        response.json().await.ok()
    }

    /// Resolve a zero-padded CIK from the submissions endpoint keyed by
    /// the raw symbol
    async fn cik_from_symbol(&self, symbol: &str) -> Option<String> {
        let data = self.get_submissions(symbol).await?;
        data.cik.map(|cik| format!("{:0>10}", cik.to_digits()))
    }
}

#[async_trait]
impl FilingsProvider for SecFilingsClient {
    async fn insider_filings(&self, symbol: &str) -> Result<Vec<InsiderFiling>, AnalysisError> {
        let Some(cik) = self.cik_from_symbol(symbol).await else {
            return Ok(Vec::new());
        };
        let Some(data) = self.get_submissions(&cik).await else {
            return Ok(Vec::new());
        };

        let recent = data
            .filings
            .and_then(|f| f.recent)
            .unwrap_or_default();

        let filings = recent
            .form
            .iter()
            .enumerate()
            .filter(|(_, form)| INSIDER_FORMS.contains(&form.as_str()))
            .map(|(i, form)| InsiderFiling {
                form: form.clone(),
                value: recent.size.get(i).copied().unwrap_or(0.0),
            })
            .collect();

        Ok(filings)
    }

    /// 13F positions need manager-level filings that the submissions
    /// endpoint only proxies, so this stays an empty placeholder.
    async fn institutional_holdings(
        &self,
        _symbol: &str,
    ) -> Result<Vec<HoldingRecord>, AnalysisError> {
        Ok(Vec::new())
    }
}

// ---- wire types ----

#[derive(Debug, Deserialize)]
struct SubmissionsResponse {
    cik: Option<CikValue>,
    filings: Option<Filings>,
}

/// EDGAR serves the CIK as either a bare number or a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CikValue {
    Text(String),
    Number(u64),
}

impl CikValue {
    fn to_digits(&self) -> String {
        match self {
            CikValue::Text(s) => s.clone(),
            CikValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: Option<RecentFilings>,
}

#[derive(Debug, Default, Deserialize)]
struct RecentFilings {
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    size: Vec<f64>,
}
