use crate::core::Pipeline;
use crate::utils::error::Result;

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub record_count: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting unification run");

        tracing::info!("Extracting sources...");
        let batches = self.pipeline.extract()?;
        let extracted: usize = batches.iter().map(|b| b.records.len()).sum();
        tracing::info!("Extracted {} records from {} sources", extracted, batches.len());

        tracing::info!("Normalizing records...");
        let unified = self.pipeline.transform(batches)?;
        tracing::info!("Normalized {} records", unified.len());

        tracing::info!("Writing unified output...");
        let output_path = self.pipeline.load(&unified)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            record_count: unified.len(),
        })
    }
}
