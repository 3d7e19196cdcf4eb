use crate::domain::model::{RecordTable, SplitReport, SplitResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn address_column(&self) -> &str;
    fn cities(&self) -> &[String];
    fn output_pattern(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordTable>;
    async fn transform(&self, table: RecordTable) -> Result<SplitResult>;
    async fn load(&self, result: SplitResult) -> Result<SplitReport>;
}
