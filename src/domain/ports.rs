use crate::domain::model::{DatasetProfile, SourceBatch, UnifiedRecord};
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn sources(&self) -> &[DatasetProfile];
    fn output_path(&self) -> &str;
}

pub trait Pipeline: Send + Sync {
    fn extract(&self) -> Result<Vec<SourceBatch>>;
    fn transform(&self, batches: Vec<SourceBatch>) -> Result<Vec<UnifiedRecord>>;
    fn load(&self, records: &[UnifiedRecord]) -> Result<String>;
}
