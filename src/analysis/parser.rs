use super::types::WheatAnalysis;
use super::AnalysisError;

/// Pull the JSON verdict out of the model's reply.
///
/// Models sometimes wrap the object in markdown fences or prose, so take
/// everything from the first `{` to the last `}`.
pub fn parse_analysis(content: &str) -> Result<WheatAnalysis, AnalysisError> {
    let json = extract_json_object(content)
        .ok_or_else(|| AnalysisError::ResponseParsing("No JSON found in response".into()))?;

    serde_json::from_str(json).map_err(|e| AnalysisError::ResponseParsing(e.to_string()))
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}
