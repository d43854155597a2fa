/*!
 * Numeric external identifiers shared by both catalogs.
 *
 * The catalog and the subtitle index both key titles by AniList ID, but
 * neither is consistent about the JSON type: the same ID can arrive as a
 * number, a numeric string, or an integral float.
 */

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Numeric identifier shared across catalogs
pub type ExternalId = u32;

/// Read an external identifier from an arbitrary JSON value
///
/// Strings may hold an integer or an integral float (`"4.0"`). Returns
/// `None` for null, negative, fractional, out-of-range, or non-numeric values.
pub fn parse_external_id(value: &Value) -> Option<ExternalId> {
    match value {
        Value::Number(number) => {
            if let Some(id) = number.as_u64() {
                return ExternalId::try_from(id).ok();
            }
            integral(number.as_f64()?)
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(float: f64) -> Option<ExternalId> {
    if float >= 0.0 && float.fract() == 0.0 && float <= f64::from(ExternalId::MAX) {
        Some(float as ExternalId)
    } else {
        None
    }
}

/// serde adapter for optional, loosely typed identifier fields
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<ExternalId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_external_id))
}
