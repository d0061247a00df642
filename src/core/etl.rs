use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting course ETL run");
        self.monitor.log_stats("Start");

        // Extract
        tracing::info!("📥 Extracting listing pages...");
        let pages = self.pipeline.extract().await?;
        tracing::info!("Extracted {} pages", pages.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Parsing sections...");
        let result = self.pipeline.transform(pages).await?;
        let pages = result.pages.len();
        let sections_loaded = result.section_count();
        let rows_skipped = result.skipped_count();
        let warnings = result.warning_count();
        tracing::info!(
            "Parsed {} sections ({} blocks skipped, {} warnings)",
            sections_loaded,
            rows_skipped,
            warnings
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Loading sections...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            pages,
            sections_loaded,
            rows_skipped,
            warnings,
        })
    }
}
