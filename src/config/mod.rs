pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, DatasetProfile, FieldFilter, Geography, Unit};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::Parser;

pub use toml_config::TomlConfig;

const PARIS_SOURCE: &str = "data_raw/les-arbres.json";
const HAUTS_DE_SEINE_SOURCE: &str =
    "data_raw/arbres-remarquables-du-territoire-des-hauts-de-seine-hors-proprietes-privees.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "arbres-etl")]
#[command(about = "Unifies the Paris and Hauts-de-Seine open-data tree exports")]
pub struct CliConfig {
    /// Paris tree export (filtered to remarkable trees)
    #[arg(long, default_value = PARIS_SOURCE)]
    pub paris_source: String,

    /// Hauts-de-Seine remarkable-trees export (used in full)
    #[arg(long, default_value = HAUTS_DE_SEINE_SOURCE)]
    pub hauts_de_seine_source: String,

    #[arg(long, default_value = "data/arbres.json")]
    pub output_path: String,

    /// TOML sources file; overrides the per-source flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolves the runtime source configuration: the TOML file when given,
    /// otherwise the built-in two-source profile driven by the path flags.
    pub fn into_sources(self) -> Result<SourcesConfig> {
        if let Some(path) = &self.config {
            let toml_config = TomlConfig::from_file(path)?;
            toml_config.validate()?;
            return Ok(toml_config.into_sources());
        }

        Ok(SourcesConfig {
            sources: vec![
                DatasetProfile {
                    name: "paris".to_string(),
                    path: self.paris_source,
                    unit: Unit::Meters,
                    geography: Geography::ParisArrondissement,
                    filter: Some(FieldFilter {
                        field: "remarquable".to_string(),
                        equals: "OUI".to_string(),
                    }),
                },
                DatasetProfile {
                    name: "hauts-de-seine".to_string(),
                    path: self.hauts_de_seine_source,
                    unit: Unit::Meters,
                    geography: Geography::Commune,
                    filter: None,
                },
            ],
            output_path: self.output_path,
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paris_source", &self.paris_source)?;
        validate_path("hauts_de_seine_source", &self.hauts_de_seine_source)?;
        validate_path("output_path", &self.output_path)?;
        if let Some(config) = &self.config {
            validate_non_empty_string("config", config)?;
        }
        Ok(())
    }
}

/// Resolved runtime configuration: the source profiles in output order plus
/// the destination path.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub sources: Vec<DatasetProfile>,
    pub output_path: String,
}

impl ConfigProvider for SourcesConfig {
    fn sources(&self) -> &[DatasetProfile] {
        &self.sources
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}
