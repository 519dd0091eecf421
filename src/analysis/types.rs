use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::AnalysisError;

/// Verdict relayed to the client, in the model's own JSON shape.
///
/// Deserialization is lenient: a missing `isWheatLeaf` reads as false, null
/// objects become defaults, and textual confidences like `"87%"` are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheatAnalysis {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_wheat_leaf: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disease: DiseaseVerdict,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// All fields are null when the photo is not a wheat leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseVerdict {
    #[serde(default)]
    pub name: Option<String>,
    /// "Low" | "Medium" | "High"; kept as text so an off-script model reply
    /// is relayed rather than dropped.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub prevention: Option<String>,
}

/// `true`/`false`, or their string spellings. Anything else reads as false.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Numbers, or numeric strings with an optional trailing `%`.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse().ok(),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Hosted vision model abstraction (allows mocking).
pub trait VisionGateway: Send + Sync {
    /// Send a `data:image/...;base64,` URL, get the model's raw reply text.
    fn analyze_image(&self, image_data_url: &str) -> Result<String, AnalysisError>;

    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_model_shape() {
        let json = r#"{
            "isWheatLeaf": true,
            "disease": {"name": "Leaf Rust", "severity": "Medium", "confidence": 87,
                        "treatment": "Fungicide", "prevention": "Resistant varieties"},
            "message": "Orange pustules visible"
        }"#;
        let analysis: WheatAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.is_wheat_leaf);
        assert_eq!(analysis.disease.name.as_deref(), Some("Leaf Rust"));
        assert_eq!(analysis.disease.confidence, Some(87.0));
    }

    #[test]
    fn null_disease_fields_accepted() {
        let json = r#"{"isWheatLeaf": false,
            "disease": {"name": null, "severity": null, "confidence": null,
                        "treatment": null, "prevention": null},
            "message": "This is a photo of the sky"}"#;
        let analysis: WheatAnalysis = serde_json::from_str(json).unwrap();
        assert!(!analysis.is_wheat_leaf);
        assert_eq!(analysis.disease, DiseaseVerdict::default());
    }

    #[test]
    fn missing_leaf_flag_reads_false() {
        let json = r#"{"disease": {"name": "Leaf Rust"}, "message": "Unclear"}"#;
        let analysis: WheatAnalysis = serde_json::from_str(json).unwrap();
        assert!(!analysis.is_wheat_leaf);
        assert_eq!(analysis.disease.name.as_deref(), Some("Leaf Rust"));
    }

    #[test]
    fn string_leaf_flag_accepted() {
        let analysis: WheatAnalysis = serde_json::from_str(r#"{"isWheatLeaf": "True"}"#).unwrap();
        assert!(analysis.is_wheat_leaf);
        let analysis: WheatAnalysis = serde_json::from_str(r#"{"isWheatLeaf": "maybe"}"#).unwrap();
        assert!(!analysis.is_wheat_leaf);
    }

    #[test]
    fn textual_confidence_parsed_or_dropped() {
        let parse = |raw: &str| {
            let json = format!(r#"{{"isWheatLeaf": true, "disease": {{"confidence": {raw}}}}}"#);
            serde_json::from_str::<WheatAnalysis>(&json).unwrap().disease.confidence
        };
        assert_eq!(parse("87.5"), Some(87.5));
        assert_eq!(parse(r#""87""#), Some(87.0));
        assert_eq!(parse(r#""87 %""#), Some(87.0));
        assert_eq!(parse(r#""high""#), None);
        assert_eq!(parse("[90]"), None);
        assert_eq!(parse("null"), None);
    }

    #[test]
    fn null_disease_and_message_default() {
        let json = r#"{"isWheatLeaf": false, "disease": null, "message": null}"#;
        let analysis: WheatAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.disease, DiseaseVerdict::default());
        assert!(analysis.message.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let analysis = WheatAnalysis {
            is_wheat_leaf: false,
            disease: DiseaseVerdict::default(),
            message: "Not a leaf".into(),
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["isWheatLeaf"], false);
        assert!(json["disease"]["name"].is_null());
    }
}
