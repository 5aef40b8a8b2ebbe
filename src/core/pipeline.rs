use crate::core::fetch::TsdrClient;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{StatusRecord, TableResult, COLUMNS};
use crate::utils::error::{LookupError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// The batch pipeline: fetch every serial number in order, render the
/// record table, bundle the renderings into a ZIP archive.
pub struct LookupPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    serials: Vec<String>,
}

impl<S: Storage, C: ConfigProvider> LookupPipeline<S, C> {
    pub fn new(storage: S, config: C, serials: Vec<String>) -> Self {
        Self {
            storage,
            config,
            serials,
        }
    }
}

fn render_table(records: &[StatusRecord], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LookupError::ProcessingError {
            message: format!("table buffer error: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| LookupError::ProcessingError {
        message: format!("table encoding error: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LookupPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<StatusRecord>> {
        // The whole batch is rejected before any network call when no API
        // key is configured.
        let api_key = self
            .config
            .api_key()
            .ok_or(LookupError::MissingConfigError {
                field: "api.key".to_string(),
            })?;

        let client = TsdrClient::new(
            self.config.base_url(),
            api_key,
            self.config.timeout_seconds(),
        );

        let mut records = Vec::new();
        for raw in &self.serials {
            let serial = raw.trim();
            if serial.is_empty() {
                continue;
            }
            tracing::info!("🔍 Fetching case status for {}", serial);
            records.push(client.fetch_status(serial).await);
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<StatusRecord>) -> Result<TableResult> {
        let csv_output = render_table(&data, b',')?;
        let tsv_output = render_table(&data, b'\t')?;
        let failed: Vec<StatusRecord> = data.iter().filter(|r| r.is_failure()).cloned().collect();

        Ok(TableResult {
            records: data,
            csv_output,
            tsv_output,
            failed,
        })
    }

    async fn load(&self, result: TableResult) -> Result<String> {
        let archive_name = format!(
            "tsdr_output_{}.zip",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let output_path = format!("{}/{}", self.config.output_path(), archive_name);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for format in self.config.output_formats() {
                match format.as_str() {
                    "csv" => {
                        zip.start_file::<_, ()>("output.csv", FileOptions::default())?;
                        zip.write_all(result.csv_output.as_bytes())?;
                    }
                    "tsv" => {
                        zip.start_file::<_, ()>("output.tsv", FileOptions::default())?;
                        zip.write_all(result.tsv_output.as_bytes())?;
                    }
                    "json" => {
                        zip.start_file::<_, ()>("output.json", FileOptions::default())?;
                        let json = serde_json::to_string_pretty(&result.records)?;
                        zip.write_all(json.as_bytes())?;
                    }
                    other => tracing::warn!("Skipping unsupported output format: {}", other),
                }
            }

            // Failed lookups travel alongside the table so they are easy
            // to re-run.
            if !result.failed.is_empty() {
                zip.start_file::<_, ()>("failed_lookups.json", FileOptions::default())?;
                let json = serde_json::to_string_pretty(&result.failed)?;
                zip.write_all(json.as_bytes())?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing archive ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&archive_name, &zip_data).await?;

        Ok(output_path)
    }
}
