use serde::Deserialize;

use crate::insight::{Adjustment, InsightError, MAX_FACTOR, MIN_FACTOR};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdjustment {
    insight: String,
    adjustment_factor: f64,
    confidence: f64,
}

/// Decodes a model reply into an [`Adjustment`].
///
/// The reply must hold exactly one JSON object, optionally wrapped in a
/// markdown fence or surrounding prose. Missing fields, wrong types, a blank
/// insight, or numbers outside their ranges are all rejected.
pub fn decode_adjustment(text: &str) -> Result<Adjustment, InsightError> {
    let json = extract_json(text)
        .ok_or_else(|| InsightError::Decode("response missing JSON object".to_string()))?;
    let raw: RawAdjustment =
        serde_json::from_str(json).map_err(|err| InsightError::Decode(err.to_string()))?;

    let insight = raw.insight.trim();
    if insight.is_empty() {
        return Err(InsightError::Decode("insight is empty".to_string()));
    }
    if !(MIN_FACTOR..=MAX_FACTOR).contains(&raw.adjustment_factor) {
        return Err(InsightError::Decode(format!(
            "adjustmentFactor {} outside [{}, {}]",
            raw.adjustment_factor, MIN_FACTOR, MAX_FACTOR
        )));
    }
    if !(0.0..=100.0).contains(&raw.confidence) {
        return Err(InsightError::Decode(format!(
            "confidence {} outside [0, 100]",
            raw.confidence
        )));
    }

    Ok(Adjustment {
        insight: insight.to_string(),
        adjustment_factor: raw.adjustment_factor,
        confidence: raw.confidence,
        fallback: false,
    })
}

fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&text[start..=end])
}
