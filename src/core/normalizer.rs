//! Resonance normalizer: legacy payload shapes → canonical `{hri, hugoScore}`
//!
//! Field priority (first finite number wins):
//!   hri (0-1) > resonance_index (0-1) > hugo_score (0-100) > hugoScore (0-100) > score (0-100)
//! No recognized field → both null. hugoScore is always derived from hri.

use serde_json::{Map, Value};

use crate::types::NormalizedResonance;

/// (field name, divisor to bring it onto 0-1)
const FIELD_PRIORITY: [(&str, f64); 5] = [
    ("hri", 1.0),
    ("resonance_index", 1.0),
    ("hugo_score", 100.0),
    ("hugoScore", 100.0),
    ("score", 100.0),
];

/// Canonical pair from any payload. Non-objects resolve to unknown.
pub fn resolve(payload: &Value) -> NormalizedResonance {
    let Some(fields) = payload.as_object() else {
        return NormalizedResonance::default();
    };

    FIELD_PRIORITY
        .iter()
        .find_map(|(name, divisor)| {
            fields
                .get(*name)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
                .map(|v| v / divisor)
        })
        .map(from_hri)
        .unwrap_or_default()
}

/// Copy of the payload with `hri` and `hugoScore` set (possibly to null)
pub fn normalize(payload: &Value) -> Value {
    let resonance = resolve(payload);
    let mut fields = payload.as_object().cloned().unwrap_or_else(Map::new);

    fields.insert("hri".into(), resonance.hri.map(Value::from).unwrap_or(Value::Null));
    fields.insert(
        "hugoScore".into(),
        resonance.hugo_score.map(Value::from).unwrap_or(Value::Null),
    );

    Value::Object(fields)
}

/// Known HRI → canonical pair (clamped)
pub fn from_hri(raw: f64) -> NormalizedResonance {
    let hri = raw.clamp(0.0, 1.0);
    NormalizedResonance {
        hri: Some(hri),
        hugo_score: Some(legacy_score(hri)),
    }
}

/// round(hri * 100), for display/storage only
pub fn legacy_score(hri: f64) -> u8 {
    (hri.clamp(0.0, 1.0) * 100.0).round() as u8
}

// =============================================================================
// TESTS
// =============================================================================
