use crate::core::extract::extract_record;
use crate::domain::model::StatusRecord;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "USPTO-API-KEY";

/// Client for the TSDR case-status endpoint. One GET per serial number,
/// no retries; every failure is contained in the returned record.
pub struct TsdrClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl TsdrClient {
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    fn case_status_url(&self, serial: &str) -> String {
        format!("{}/ts/cd/casestatus/sn{}/info.xml", self.base_url, serial)
    }

    /// Fetch and extract one case-status record. HTTP failures, transport
    /// failures, and unparseable bodies all come back as an error record
    /// for the serial, never as an `Err`.
    pub async fn fetch_status(&self, serial: &str) -> StatusRecord {
        match self.request_record(serial).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("⚠️ Lookup failed for {}: {}", serial, e);
                StatusRecord::failure(serial, e.to_string())
            }
        }
    }

    async fn request_record(&self, serial: &str) -> Result<StatusRecord> {
        let url = self.case_status_url(serial);
        tracing::debug!("Requesting case status: {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status for {}: {}", serial, status);

        if !status.is_success() {
            return Ok(StatusRecord::failure(
                serial,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body = response.text().await?;
        extract_record(serial, &body)
    }
}
