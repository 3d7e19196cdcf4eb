use crate::core::{Pipeline, SplitReport};
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

    /// Run extract, transform and load in order. The first error stops the
    /// run; files already written stay on disk.
    pub async fn run(&self) -> Result<SplitReport> {
        tracing::info!("Starting split...");

        let table = self.pipeline.extract().await?;
        tracing::info!("Loaded {} rows", table.len());
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(table).await?;
        tracing::info!("Filtered {} cities", result.partitions.len());
        self.monitor.log_stats("Transform");

        let report = self.pipeline.load(result).await?;
        tracing::info!("Wrote {} files", report.files_written());
        self.monitor.log_stats("Load");

        if self.monitor.is_enabled() {
            self.monitor.log_final_stats();
        }

        Ok(report)
    }
}
