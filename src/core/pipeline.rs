use crate::core::split::{self, filter_by_city, write_if_nonempty};
use crate::core::{
    CityOutcome, CityPartition, ConfigProvider, Pipeline, RecordTable, SplitReport, SplitResult,
    Storage,
};
use crate::utils::error::Result;

/// Loads the input once, filters it per configured city and writes each
/// non-empty subset, in label order.
pub struct CitySplitPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    dry_run: bool,
}

impl<S: Storage, C: ConfigProvider> CitySplitPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            dry_run: false,
        }
    }

    /// Filter as usual but write nothing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CitySplitPipeline<S, C> {
    async fn extract(&self) -> Result<RecordTable> {
        tracing::debug!(
            "Loading {} (address column: {})",
            self.config.input_path(),
            self.config.address_column()
        );
        split::load(
            &self.storage,
            self.config.input_path(),
            self.config.address_column(),
        )
        .await
    }

    async fn transform(&self, table: RecordTable) -> Result<SplitResult> {
        let partitions = self
            .config
            .cities()
            .iter()
            .map(|label| {
                let subset = filter_by_city(&table, label);
                tracing::debug!("{}: {} matching rows", label, subset.len());
                CityPartition {
                    label: label.clone(),
                    subset,
                }
            })
            .collect();

        Ok(SplitResult {
            total_rows: table.len(),
            partitions,
        })
    }

    async fn load(&self, result: SplitResult) -> Result<SplitReport> {
        let mut cities = Vec::with_capacity(result.partitions.len());

        for partition in &result.partitions {
            let output_path = if self.dry_run {
                (!partition.subset.is_empty()).then(|| {
                    split::output_path(
                        self.config.output_dir(),
                        self.config.output_pattern(),
                        &partition.label,
                    )
                })
            } else {
                write_if_nonempty(
                    &self.storage,
                    &partition.subset,
                    &partition.label,
                    self.config.output_dir(),
                    self.config.output_pattern(),
                )
                .await?
            };

            match &output_path {
                Some(path) if self.dry_run => tracing::info!(
                    "🔍 {}: {} rows would be written to {}",
                    partition.label,
                    partition.subset.len(),
                    path
                ),
                Some(path) => tracing::info!(
                    "📝 {}: {} rows written to {}",
                    partition.label,
                    partition.subset.len(),
                    path
                ),
                None => tracing::info!("⏭️  {}: no matching rows, nothing written", partition.label),
            }

            cities.push(CityOutcome {
                label: partition.label.clone(),
                matched_rows: partition.subset.len(),
                output_path,
            });
        }

        Ok(SplitReport {
            generated_at: chrono::Utc::now(),
            input_path: self.config.input_path().to_string(),
            total_rows: result.total_rows,
            dry_run: self.dry_run,
            cities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitConfig;
    use crate::utils::error::SplitError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_writes: bool,
        fail_on: Option<String>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn file_count(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).ok_or_else(|| SplitError::NotFound {
                path: path.to_string(),
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.fail_writes || self.fail_on.as_deref() == Some(path) {
                return Err(SplitError::Write {
                    path: path.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    const INPUT: &str = "name,address\n\
        A,\"123 Main St, Brampton, ON\"\n\
        B,\"55 Yonge St, Toronto, ON\"\n\
        C,\"1 Queen St, Brampton, ON\"\n\
        D,no city here\n";

    fn config() -> SplitConfig {
        SplitConfig {
            input_path: "in.csv".to_string(),
            output_dir: "out".to_string(),
            ..SplitConfig::default()
        }
    }

    async fn run<S: Storage>(pipeline: &CitySplitPipeline<S, SplitConfig>) -> Result<SplitReport> {
        let table = pipeline.extract().await?;
        let result = pipeline.transform(table).await?;
        pipeline.load(result).await
    }

    #[test]
    fn test_pipeline_writes_only_matching_cities() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let pipeline = CitySplitPipeline::new(storage, config());

        let report = tokio_test::block_on(run(&pipeline)).unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.files_written(), 2);
        let counts: Vec<(&str, usize)> = report
            .cities
            .iter()
            .map(|c| (c.label.as_str(), c.matched_rows))
            .collect();
        assert_eq!(
            counts,
            vec![("Brampton", 2), ("Toronto", 1), ("Mississauga", 0), ("Etobicoke", 0)]
        );

        let brampton_path = split::output_path("out", "mastoorat_{label}.csv", "Brampton");
        let brampton = pipeline.storage.get_file(&brampton_path).unwrap();
        assert_eq!(
            String::from_utf8(brampton).unwrap(),
            "name,address\nA,\"123 Main St, Brampton, ON\"\nC,\"1 Queen St, Brampton, ON\"\n"
        );
        // input + two outputs
        assert_eq!(pipeline.storage.file_count(), 3);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let storage = MockStorage::with_file("in.csv", INPUT);
        let pipeline = CitySplitPipeline::new(storage, config()).with_dry_run(true);

        let report = tokio_test::block_on(run(&pipeline)).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files_written(), 2);
        assert_eq!(pipeline.storage.file_count(), 1);
    }

    #[test]
    fn test_write_failure_propagates() {
        let storage = MockStorage {
            fail_writes: true,
            ..MockStorage::with_file("in.csv", INPUT)
        };
        let pipeline = CitySplitPipeline::new(storage, config());

        let err = tokio_test::block_on(run(&pipeline)).unwrap_err();
        assert!(matches!(err, SplitError::Write { .. }));
    }

    #[test]
    fn test_write_failure_keeps_earlier_files_and_stops_later_labels() {
        let input = "name,address\n\
            A,\"1 Main St, Brampton\"\n\
            B,\"55 Yonge St, Toronto\"\n\
            C,\"9 Dixie Rd, Mississauga\"\n";
        let toronto_path = split::output_path("out", "mastoorat_{label}.csv", "Toronto");
        let storage = MockStorage {
            fail_on: Some(toronto_path.clone()),
            ..MockStorage::with_file("in.csv", input)
        };
        let pipeline = CitySplitPipeline::new(storage, config());

        let err = tokio_test::block_on(run(&pipeline)).unwrap_err();

        assert!(matches!(err, SplitError::Write { ref path, .. } if *path == toronto_path));
        let brampton_path = split::output_path("out", "mastoorat_{label}.csv", "Brampton");
        let mississauga_path = split::output_path("out", "mastoorat_{label}.csv", "Mississauga");
        assert!(pipeline.storage.get_file(&brampton_path).is_some());
        assert!(pipeline.storage.get_file(&toronto_path).is_none());
        assert!(pipeline.storage.get_file(&mississauga_path).is_none());
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let pipeline = CitySplitPipeline::new(MockStorage::default(), config());
        let err = tokio_test::block_on(pipeline.extract()).unwrap_err();
        assert!(matches!(err, SplitError::NotFound { .. }));
    }
}
