pub mod etl;
pub mod loader;
pub mod normalize;
pub mod pipeline;

pub use crate::domain::model::{
    DatasetProfile, FieldFilter, Geography, Record, SourceBatch, UnifiedRecord, Unit,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
