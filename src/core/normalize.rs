use crate::core::{Geography, Record, UnifiedRecord, Unit};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

// Candidate source keys per target field, highest priority first. The Paris
// export uses `libellefrancais`/`hauteurenm`/`arrondissement`, the
// Hauts-de-Seine export `nom_francais`/`hauteur`/`commune`.
const NOM_FRANCAIS_KEYS: &[&str] = &["nom_francais", "libellefrancais"];
const HAUTEUR_KEYS: &[&str] = &["hauteurenm", "hauteur"];
const CIRCONFERENCE_KEYS: &[&str] = &["circonferenceencm", "circonference"];
const GEO_POINT_KEYS: &[&str] = &["geo_point_2d"];
const COMMUNE_KEYS: &[&str] = &["commune", "arrondissement"];
const CODE_INSEE_KEYS: &[&str] = &["code_insee"];

/// Maps one raw record to the unified seven-key shape. Pure and
/// deterministic; anomalies in the source resolve to null, never to an error.
pub fn normalize(record: &Record, unit: Unit, geography: Geography) -> UnifiedRecord {
    let commune_label = pick(record, COMMUNE_KEYS);
    let commune_label = commune_label.as_ref().and_then(Value::as_str);

    let code_insee = match geography {
        Geography::ParisArrondissement => commune_label.and_then(code_insee_paris),
        Geography::Commune => pick(record, CODE_INSEE_KEYS).and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }),
    };

    UnifiedRecord {
        nom_francais: pick(record, NOM_FRANCAIS_KEYS),
        hauteur: pick(record, HAUTEUR_KEYS).map(|v| convert_measurement(v, unit)),
        circonference: pick(record, CIRCONFERENCE_KEYS).map(|v| convert_measurement(v, unit)),
        geo_point_2d: pick(record, GEO_POINT_KEYS),
        commune: normalize_commune(commune_label),
        code_insee,
        nom_latin: normalize_nom_latin(record),
    }
}

/// Returns the value of the first candidate key present in the record whose
/// value is neither null nor an empty string.
pub fn pick(record: &Record, candidates: &[&str]) -> Option<Value> {
    for key in candidates {
        match record.data.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(value) => return Some(value.clone()),
        }
    }
    None
}

/// Normalizes a free-text commune or arrondissement label.
///
/// The two Paris woods get their canonical names, arrondissement labels
/// become "Paris Nème" ("Paris 1er" for the first), and everything else is
/// title-cased.
pub fn normalize_commune(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    if upper.contains("BOIS DE BOULOGNE") {
        return Some("Bois de Boulogne".to_string());
    }
    if upper.contains("BOIS DE VINCENNES") {
        return Some("Bois de Vincennes".to_string());
    }
    if upper.contains("ARRDT") {
        return Some(match arrondissement_number(&upper) {
            Some(1) => "Paris 1er".to_string(),
            Some(n) => format!("Paris {}ème", n),
            None => "Paris".to_string(),
        });
    }

    Some(title_case(trimmed))
}

/// Derives the 5-digit INSEE code from a Paris arrondissement label.
///
/// The woods map to the arrondissements that administer them; numbered
/// labels map to 75001–75020. Anything else has no derivable code.
pub fn code_insee_paris(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    if upper.contains("BOIS DE BOULOGNE") {
        return Some("75016".to_string());
    }
    if upper.contains("BOIS DE VINCENNES") {
        return Some("75012".to_string());
    }
    if upper.contains("ARRDT") {
        return match arrondissement_number(&upper) {
            Some(n) if (1..=20).contains(&n) => Some(format!("750{:02}", n)),
            _ => None,
        };
    }

    None
}

/// Builds the latin name: a direct `nom_latin` field wins, otherwise genus
/// and species are joined with a space (either one alone if that is all the
/// record has).
pub fn normalize_nom_latin(record: &Record) -> Option<String> {
    if let Some(direct) = pick(record, &["nom_latin"]) {
        if let Some(s) = direct.as_str() {
            return Some(s.to_string());
        }
    }

    let genre = pick(record, &["genre"]).and_then(|v| v.as_str().map(str::to_string));
    let espece = pick(record, &["espece"]).and_then(|v| v.as_str().map(str::to_string));

    match (genre, espece) {
        (Some(genre), Some(espece)) => Some(format!("{} {}", genre, espece)),
        (Some(genre), None) => Some(genre),
        (None, Some(espece)) => Some(espece),
        (None, None) => None,
    }
}

/// Converts a measurement to centimeters according to the source's declared
/// unit. Meter values >= 1000 are assumed to already be centimeters (the
/// Paris export mixes units in its height column) and pass through, as do
/// non-numeric values.
pub fn convert_measurement(value: Value, unit: Unit) -> Value {
    if unit == Unit::Centimeters {
        return value;
    }

    if let Some(n) = value.as_i64() {
        if n < 1000 {
            return Value::from(n * 100);
        }
    } else if let Some(f) = value.as_f64() {
        if f < 1000.0 {
            if let Some(scaled) = serde_json::Number::from_f64(f * 100.0) {
                return Value::Number(scaled);
            }
        }
    }

    value
}

/// Extracts the arrondissement number from an uppercased label like
/// "PARIS 7E ARRDT" or "1ER ARRDT".
fn arrondissement_number(upper: &str) -> Option<u32> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"(\d+)(?:ER|E)?\s*ARRDT").unwrap());

    pattern
        .captures(upper)
        .and_then(|caps| caps[1].parse().ok())
}

// Python-style title case: the first letter after any non-alphabetic
// character is capitalized, so hyphenated commune names keep every part
// capitalized ("Neuilly-Sur-Seine").
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}
