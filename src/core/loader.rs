use crate::core::Record;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// Parses one source export into its record sequence.
///
/// Both exports come in one of two shapes: a bare JSON array of records, or
/// an object wrapping the records in a `"results"` array (the opendatasoft
/// download format). Anything else is schema drift and gets reported instead
/// of being silently treated as empty.
pub fn parse_records(label: &str, bytes: &[u8]) -> Result<Vec<Record>> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    records_from_document(label, document)
}

fn records_from_document(label: &str, document: serde_json::Value) -> Result<Vec<Record>> {
    let items = match document {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("results") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(EtlError::UnexpectedShape {
                    source_name: label.to_string(),
                })
            }
        },
        _ => {
            return Err(EtlError::UnexpectedShape {
                source_name: label.to_string(),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        if let serde_json::Value::Object(obj) = item {
            let mut data = HashMap::new();
            for (key, value) in obj {
                data.insert(key, value);
            }
            records.push(Record { data });
        } else {
            tracing::warn!("Skipping non-object entry in {}", label);
        }
    }

    Ok(records)
}
