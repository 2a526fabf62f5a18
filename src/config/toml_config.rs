use crate::config::SourcesConfig;
use crate::core::{DatasetProfile, FieldFilter, Geography, Unit};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative sources file, for runs against exports living somewhere other
/// than the default layout:
///
/// ```toml
/// [pipeline]
/// name = "arbres"
///
/// [[source]]
/// name = "paris"
/// path = "data_raw/les-arbres.json"
/// unit = "meters"
/// geography = "paris_arrondissement"
///
/// [source.filter]
/// field = "remarquable"
/// equals = "OUI"
///
/// [load]
/// output_path = "data/arbres.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(rename = "source")]
    pub sources: Vec<SourceConfig>,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub path: String,
    pub unit: Unit,
    pub geography: Geography,
    pub filter: Option<FieldFilter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn into_sources(self) -> SourcesConfig {
        SourcesConfig {
            sources: self
                .sources
                .into_iter()
                .map(|source| DatasetProfile {
                    name: source.name,
                    path: source.path,
                    unit: source.unit,
                    geography: source.geography,
                    filter: source.filter,
                })
                .collect(),
            output_path: self.load.output_path,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_path("load.output_path", &self.load.output_path)?;

        if self.sources.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "source".to_string(),
            });
        }

        for source in &self.sources {
            validate_non_empty_string("source.name", &source.name)?;
            validate_path("source.path", &source.path)?;
        }

        Ok(())
    }
}
