pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, CliConfig, SourcesConfig};
pub use crate::core::{etl::EtlEngine, pipeline::UnifyPipeline};
pub use crate::utils::error::{EtlError, Result};
