/*!
 * Embedded page state extraction.
 *
 * Server-rendered catalog pages carry their data model as a JSON blob inside
 * a script tag. This module isolates that blob between two marker strings and
 * parses it. Every failure (missing marker, truncated document, malformed
 * JSON) yields `None`; callers treat that as "no data".
 */

use log::debug;
use serde_json::Value;

/// Opening tag text that follows the Next.js start marker up to the payload
const NEXT_DATA_TAG: &str = "__NEXT_DATA__\" type=\"application/json\">";

/// Marker pair delimiting an embedded JSON payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMarkers {
    /// Text whose first occurrence starts the slice
    pub start: String,
    /// Text whose first occurrence at or after `start` ends the slice
    pub end: String,
    /// Number of leading bytes of the slice that belong to the opening tag
    pub prefix_len: usize,
}

impl StateMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>, prefix_len: usize) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            prefix_len,
        }
    }

    /// Markers for the `__NEXT_DATA__` script tag emitted by Next.js
    pub fn next_data() -> Self {
        Self::new("__NEXT_DATA__", "</script>", NEXT_DATA_TAG.len())
    }
}

impl Default for StateMarkers {
    fn default() -> Self {
        Self::next_data()
    }
}

/// Slice of `html` from the first `start` up to the first `end` after it
///
/// The end marker is searched only in the remainder following the start
/// position, so a missing end marker costs one bounded scan.
pub fn trim_between<'a>(html: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let start_index = html.find(start)?;
    let end_offset = html[start_index..].find(end)?;
    Some(&html[start_index..start_index + end_offset])
}

/// Extract and parse the JSON payload delimited by `markers`
pub fn extract_embedded_state(html: &str, markers: &StateMarkers) -> Option<Value> {
    if html.is_empty() {
        debug!("Empty document passed to state extraction");
        return None;
    }

    let Some(trimmed) = trim_between(html, &markers.start, &markers.end) else {
        debug!(
            "State markers '{}'..'{}' not found in document",
            markers.start, markers.end
        );
        return None;
    };

    let payload = match trimmed.get(markers.prefix_len..) {
        Some(payload) if !payload.trim().is_empty() => payload,
        _ => {
            debug!("Nothing left after stripping {} prefix bytes", markers.prefix_len);
            return None;
        }
    };

    match serde_json::from_str(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Embedded state is not valid JSON: {}", e);
            None
        }
    }
}

/// Extract the Next.js `__NEXT_DATA__` payload
pub fn next_data(html: &str) -> Option<Value> {
    extract_embedded_state(html, &StateMarkers::next_data())
}
