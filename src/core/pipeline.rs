use crate::core::{
    loader, normalize, ConfigProvider, Pipeline, SourceBatch, Storage, UnifiedRecord,
};
use crate::utils::error::Result;

/// The unification pipeline: read every configured source export, normalize
/// each record with its source's profile, and write one merged JSON array.
pub struct UnifyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> UnifyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for UnifyPipeline<S, C> {
    fn extract(&self) -> Result<Vec<SourceBatch>> {
        let mut batches = Vec::with_capacity(self.config.sources().len());

        for profile in self.config.sources() {
            tracing::debug!("Reading source '{}' from {}", profile.name, profile.path);
            let bytes = self.storage.read_file(&profile.path)?;
            let mut records = loader::parse_records(&profile.path, &bytes)?;
            let total = records.len();

            if let Some(filter) = &profile.filter {
                records.retain(|record| filter.matches(record));
                tracing::info!(
                    "Source '{}': kept {} of {} records ({} == \"{}\")",
                    profile.name,
                    records.len(),
                    total,
                    filter.field,
                    filter.equals
                );
            } else {
                tracing::info!("Source '{}': {} records", profile.name, total);
            }

            batches.push(SourceBatch {
                profile: profile.clone(),
                records,
            });
        }

        Ok(batches)
    }

    fn transform(&self, batches: Vec<SourceBatch>) -> Result<Vec<UnifiedRecord>> {
        let mut unified = Vec::new();

        for batch in batches {
            let profile = &batch.profile;
            for record in &batch.records {
                unified.push(normalize::normalize(
                    record,
                    profile.unit,
                    profile.geography,
                ));
            }
            tracing::debug!("Normalized source '{}'", profile.name);
        }

        Ok(unified)
    }

    fn load(&self, records: &[UnifiedRecord]) -> Result<String> {
        let output_path = self.config.output_path().to_string();

        // serde_json keeps non-ASCII characters literal, so the French names
        // survive to disk unescaped.
        let json = serde_json::to_string_pretty(records)?;
        self.storage.write_file(&output_path, json.as_bytes())?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DatasetProfile, FieldFilter, Geography, Unit};
    use crate::utils::error::EtlError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: Mutex::new(
                    files
                        .iter()
                        .map(|(path, body)| (path.to_string(), body.as_bytes().to_vec()))
                        .collect(),
                ),
            }
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no such file: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        sources: Vec<DatasetProfile>,
        output_path: String,
    }

    impl ConfigProvider for TestConfig {
        fn sources(&self) -> &[DatasetProfile] {
            &self.sources
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }
    }

    fn paris_profile(path: &str) -> DatasetProfile {
        DatasetProfile {
            name: "paris".to_string(),
            path: path.to_string(),
            unit: Unit::Meters,
            geography: Geography::ParisArrondissement,
            filter: Some(FieldFilter {
                field: "remarquable".to_string(),
                equals: "OUI".to_string(),
            }),
        }
    }

    fn commune_profile(path: &str) -> DatasetProfile {
        DatasetProfile {
            name: "hauts-de-seine".to_string(),
            path: path.to_string(),
            unit: Unit::Meters,
            geography: Geography::Commune,
            filter: None,
        }
    }

    #[test]
    fn test_extract_applies_remarkable_filter() {
        let storage = MockStorage::new(&[(
            "paris.json",
            r#"[{"remarquable": "OUI", "hauteurenm": 8},
                {"remarquable": "NON", "hauteurenm": 3},
                {"hauteurenm": 4}]"#,
        )]);
        let config = TestConfig {
            sources: vec![paris_profile("paris.json")],
            output_path: "out/arbres.json".to_string(),
        };

        let batches = UnifyPipeline::new(storage, config).extract().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records.len(), 1);
    }

    #[test]
    fn test_extract_missing_source_is_fatal() {
        let storage = MockStorage::new(&[]);
        let config = TestConfig {
            sources: vec![paris_profile("absent.json")],
            output_path: "out/arbres.json".to_string(),
        };

        let err = UnifyPipeline::new(storage, config).extract().unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }

    #[test]
    fn test_transform_concatenates_in_source_order() {
        let storage = MockStorage::new(&[]);
        let config = TestConfig {
            sources: vec![],
            output_path: "out/arbres.json".to_string(),
        };
        let pipeline = UnifyPipeline::new(storage, config);

        let batches = vec![
            SourceBatch {
                profile: paris_profile("paris.json"),
                records: vec![crate::core::Record {
                    data: [("libellefrancais".to_string(), json!("Chêne"))]
                        .into_iter()
                        .collect(),
                }],
            },
            SourceBatch {
                profile: commune_profile("hds.json"),
                records: vec![crate::core::Record {
                    data: [("nom_francais".to_string(), json!("Tilleul"))]
                        .into_iter()
                        .collect(),
                }],
            },
        ];

        let unified = pipeline.transform(batches).unwrap();
        assert_eq!(unified.len(), 2);
        assert_eq!(unified[0].nom_francais, Some(json!("Chêne")));
        assert_eq!(unified[1].nom_francais, Some(json!("Tilleul")));
    }

    #[test]
    fn test_load_round_trips_through_storage() {
        let storage = MockStorage::new(&[
            (
                "paris.json",
                r#"[{"remarquable": "OUI", "arrondissement": "5E Arrdt",
                     "hauteurenm": 8, "libellefrancais": "Chêne"}]"#,
            ),
            ("hds.json", "[]"),
        ]);
        let config = TestConfig {
            sources: vec![paris_profile("paris.json"), commune_profile("hds.json")],
            output_path: "out/arbres.json".to_string(),
        };
        let pipeline = UnifyPipeline::new(storage, config);

        let batches = pipeline.extract().unwrap();
        let unified = pipeline.transform(batches).unwrap();
        let output_path = pipeline.load(&unified).unwrap();
        assert_eq!(output_path, "out/arbres.json");

        let written = pipeline.storage.get_file("out/arbres.json").unwrap();
        let reread: Vec<UnifiedRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(reread, unified);
        assert_eq!(reread.len(), 1);
        assert_eq!(reread[0].hauteur, Some(json!(800)));
        assert_eq!(reread[0].commune, Some("Paris 5ème".to_string()));
        assert_eq!(reread[0].code_insee, Some("75005".to_string()));

        // Non-ASCII must survive to disk literally, not as \u escapes.
        let text = String::from_utf8(written).unwrap();
        assert!(text.contains("Chêne"));
    }
}
