//! Registry response models.
//!
//! Patients are opaque: the patient registry decides which demographic fields exist,
//! so a [`PatientRecord`] is just a field map. Triage records have a fixed set of
//! vital signs. Values may arrive as strings or numbers and are always read as text.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Renders a JSON value the way a text input would show it.
///
/// Strings are taken verbatim, `null` becomes empty, anything else uses its JSON text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

/// A patient as returned by the patient registry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientRecord(Map<String, Value>);

impl PatientRecord {
    /// Wraps a response body. Anything other than a JSON object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Text of `name`, empty when the field is absent.
    pub fn field(&self, name: &str) -> String {
        self.0.get(name).map(value_text).unwrap_or_default()
    }

    /// `nombres` and `apellidos` joined by a space and trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.field("nombres"), self.field("apellidos"))
            .trim()
            .to_owned()
    }
}

/// One row of a triage search result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageSummary {
    #[serde(default, deserialize_with = "lenient_text")]
    pub dni: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha_hora: String,
}

/// Body of `GET /triajes?dni=`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TriageList {
    #[serde(default)]
    pub items: Option<Vec<TriageSummary>>,
}

impl TriageList {
    pub fn into_items(self) -> Vec<TriageSummary> {
        self.items.unwrap_or_default()
    }
}

/// A full triage record keyed by patient DNI and timestamp.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub dni: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha_hora: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub presion_arterial: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub frecuencia_cardiaca: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub saturacion_oxigeno: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub temperatura_corporal: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub peso_kg: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub talla_m: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_joins_and_trims() {
        let full = PatientRecord::from_value(json!({"nombres": "Ana", "apellidos": "Lopez"}));
        assert_eq!(full.display_name(), "Ana Lopez");

        let partial = PatientRecord::from_value(json!({"apellidos": "Lopez"}));
        assert_eq!(partial.display_name(), "Lopez");

        assert_eq!(PatientRecord::from_value(json!([])).display_name(), "");
    }

    #[test]
    fn test_triage_list_tolerates_missing_and_null_items() {
        let missing: TriageList = serde_json::from_value(json!({})).expect("decode");
        assert!(missing.into_items().is_empty());

        let null: TriageList = serde_json::from_value(json!({"items": null})).expect("decode");
        assert!(null.into_items().is_empty());
    }

    #[test]
    fn test_triage_record_reads_numbers_as_text() {
        let record: TriageRecord = serde_json::from_value(json!({
            "dni": "123",
            "fechaHora": "2024-05-01T10:30:00",
            "presionArterial": "120/80",
            "frecuenciaCardiaca": 72,
            "saturacionOxigeno": "98",
            "temperaturaCorporal": 36.5,
            "pesoKg": null
        }))
        .expect("decode");

        assert_eq!(record.frecuencia_cardiaca, "72");
        assert_eq!(record.temperatura_corporal, "36.5");
        assert_eq!(record.peso_kg, "");
        assert_eq!(record.talla_m, "");
    }
}
