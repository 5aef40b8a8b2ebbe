use crate::core::session::Session;
use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives one batch through the pipeline stages. The `Session` argument
/// keeps unauthenticated callers out at the type level.
pub struct LookupEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> LookupEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, session: &Session) -> Result<String> {
        tracing::info!("🚀 Starting TSDR batch lookup (user: {})", session.username());

        let records = self.pipeline.extract().await?;
        let failed = records.iter().filter(|r| r.is_failure()).count();
        tracing::info!("📊 Fetched {} records ({} failed)", records.len(), failed);

        let table = self.pipeline.transform(records).await?;
        tracing::info!("🔧 Rendered table with {} rows", table.records.len());

        let output_path = self.pipeline.load(table).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
