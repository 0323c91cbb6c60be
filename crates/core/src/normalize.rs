//! Row normalization: raw table rows into strict [`ProjectRecord`]s.
//!
//! [`normalize`] is total. Every malformed input degrades to a documented
//! default instead of failing, and the [`NormalizeReport`] returned alongside
//! the record says, field by field, where each value came from so callers
//! can tell a clean row from a degraded one without scraping logs.

use serde::Serialize;
use serde_json::Value;

use crate::record::{
    Coordinates, MediaItem, ProjectRecord, DEFAULT_COORDINATES, ELLIPSIS,
    LONG_DESCRIPTION_PLACEHOLDER, NAME_PLACEHOLDER, SHORT_DESCRIPTION_MAX_CHARS,
    SHORT_DESCRIPTION_PLACEHOLDER,
};
use crate::row::ProjectRow;

/// Id given to rows that arrive without a usable primary key.
pub const MISSING_ID: &str = "sin-id";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Why a field fell back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    /// The source value was absent, null or empty.
    Missing,
    /// The source value was a string that is not valid JSON.
    MalformedJson,
    /// The source value had the wrong type, arity or element types.
    WrongShape,
}

/// Where a normalized field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Taken directly from a native value in the row.
    Clean,
    /// Decoded from a JSON-encoded string column.
    Decoded,
    /// Derived from another field (short description from the long one).
    Derived,
    /// Replaced by the documented default.
    Defaulted { reason: DegradeReason },
    /// Media list kept, but `dropped` elements did not match the item shape.
    Partial { dropped: usize },
}

impl FieldOrigin {
    /// The value is not what the row literally carried.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Clean | Self::Decoded)
    }

    fn defaulted(reason: DegradeReason) -> Self {
        Self::Defaulted { reason }
    }
}

/// Per-field provenance of one normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub id: FieldOrigin,
    pub name: FieldOrigin,
    pub coordinates: FieldOrigin,
    pub short_description: FieldOrigin,
    pub long_description: FieldOrigin,
    pub media: FieldOrigin,
}

impl NormalizeReport {
    /// No field fell back to a default or derived value.
    pub fn is_clean(&self) -> bool {
        self.fields().iter().all(|(_, origin)| !origin.is_fallback())
    }

    /// Names of the fields that fell back.
    pub fn degraded_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|(_, origin)| origin.is_fallback())
            .map(|(name, _)| *name)
            .collect()
    }

    fn fields(&self) -> [(&'static str, &FieldOrigin); 6] {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("coordinates", &self.coordinates),
            ("short_description", &self.short_description),
            ("long_description", &self.long_description),
            ("media", &self.media),
        ]
    }
}

/// A normalized record together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: ProjectRecord,
    pub report: NormalizeReport,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one raw row. Never fails.
pub fn normalize(row: &ProjectRow) -> Normalized {
    let (id, id_origin) = match row.id_string() {
        Some(id) => (id, FieldOrigin::Clean),
        None => (
            MISSING_ID.to_string(),
            FieldOrigin::defaulted(DegradeReason::Missing),
        ),
    };

    let name_text = text_column(&id, "nombre", row.nombre.as_ref());
    let map_text = text_column(&id, "map_description", row.map_description.as_ref());
    let long_text = text_column(&id, "descripcion", row.descripcion.as_ref());

    let (name, name_origin) = match name_text {
        Ok(name) => (name.to_string(), FieldOrigin::Clean),
        Err(reason) => (NAME_PLACEHOLDER.to_string(), FieldOrigin::defaulted(reason)),
    };

    let (coordinates, coordinates_origin) = normalize_coordinates(&id, row.coordinates.as_ref());
    let (media, media_origin) = normalize_media(&id, row.media.as_ref());

    let (short_description, mut short_origin) = short_description(map_text.ok(), long_text.ok());
    if map_text == Err(DegradeReason::WrongShape) && matches!(short_origin, FieldOrigin::Defaulted { .. }) {
        short_origin = FieldOrigin::defaulted(DegradeReason::WrongShape);
    }

    let (long_description, long_origin) = match long_text {
        Ok(text) => (text.to_string(), FieldOrigin::Clean),
        Err(reason) => (
            LONG_DESCRIPTION_PLACEHOLDER.to_string(),
            FieldOrigin::defaulted(reason),
        ),
    };

    Normalized {
        record: ProjectRecord {
            id,
            name,
            coordinates,
            short_description,
            long_description,
            media,
        },
        report: NormalizeReport {
            id: id_origin,
            name: name_origin,
            coordinates: coordinates_origin,
            short_description: short_origin,
            long_description: long_origin,
            media: media_origin,
        },
    }
}

/// Normalize a batch, preserving order.
pub fn normalize_all<'a>(rows: impl IntoIterator<Item = &'a ProjectRow>) -> Vec<Normalized> {
    rows.into_iter().map(normalize).collect()
}

/// Short description fallback chain: explicit map description, else the
/// first [`SHORT_DESCRIPTION_MAX_CHARS`] characters of the long description
/// (plus [`ELLIPSIS`] when it was longer), else the placeholder.
pub fn short_description(
    map_description: Option<&str>,
    long_description: Option<&str>,
) -> (String, FieldOrigin) {
    if let Some(text) = map_description {
        return (text.to_string(), FieldOrigin::Clean);
    }
    match long_description {
        Some(long) => (truncate_with_ellipsis(long), FieldOrigin::Derived),
        None => (
            SHORT_DESCRIPTION_PLACEHOLDER.to_string(),
            FieldOrigin::defaulted(DegradeReason::Missing),
        ),
    }
}

fn truncate_with_ellipsis(text: &str) -> String {
    match text.char_indices().nth(SHORT_DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// A usable text cell. Null and empty strings are missing; any other JSON
/// type is the wrong shape.
fn text_column<'a>(id: &str, column: &str, raw: Option<&'a Value>) -> Result<&'a str, DegradeReason> {
    match raw {
        None | Some(Value::Null) => Err(DegradeReason::Missing),
        Some(Value::String(s)) if s.is_empty() => Err(DegradeReason::Missing),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => {
            tracing::debug!(project_id = id, column, "Text column holds a non-string value");
            Err(DegradeReason::WrongShape)
        }
    }
}

fn normalize_coordinates(id: &str, raw: Option<&Value>) -> (Coordinates, FieldOrigin) {
    let fallback = |reason| (DEFAULT_COORDINATES, FieldOrigin::defaulted(reason));

    match raw {
        None | Some(Value::Null) => fallback(DegradeReason::Missing),
        Some(Value::String(s)) if s.is_empty() => fallback(DegradeReason::Missing),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => match coordinate_pair(&parsed) {
                Some(pair) => (pair, FieldOrigin::Decoded),
                None => fallback(DegradeReason::WrongShape),
            },
            Err(e) => {
                tracing::debug!(project_id = id, error = %e, "Unparsable coordinates string, using default");
                fallback(DegradeReason::MalformedJson)
            }
        },
        Some(value) => match coordinate_pair(value) {
            Some(pair) => (pair, FieldOrigin::Clean),
            None => fallback(DegradeReason::WrongShape),
        },
    }
}

/// Exactly two finite JSON numbers.
pub fn coordinate_pair(value: &Value) -> Option<Coordinates> {
    match value.as_array()?.as_slice() {
        [lat, lng] if lat.is_number() && lng.is_number() => {
            let pair = Coordinates::new(lat.as_f64()?, lng.as_f64()?);
            pair.is_finite().then_some(pair)
        }
        _ => None,
    }
}

fn normalize_media(id: &str, raw: Option<&Value>) -> (Vec<MediaItem>, FieldOrigin) {
    let fallback = |reason| (Vec::new(), FieldOrigin::defaulted(reason));

    match raw {
        None | Some(Value::Null) => fallback(DegradeReason::Missing),
        Some(Value::Array(items)) => decode_media_items(id, items, FieldOrigin::Clean),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => decode_media_items(id, &items, FieldOrigin::Decoded),
            Ok(_) => fallback(DegradeReason::WrongShape),
            Err(e) => {
                tracing::debug!(project_id = id, error = %e, "Unparsable media string, using empty list");
                fallback(DegradeReason::MalformedJson)
            }
        },
        Some(_) => fallback(DegradeReason::WrongShape),
    }
}

/// Decode every element; elements that do not match the item shape are
/// dropped, whichever path (native or JSON string) the array came from.
fn decode_media_items(id: &str, items: &[Value], origin: FieldOrigin) -> (Vec<MediaItem>, FieldOrigin) {
    let decoded: Vec<MediaItem> = items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect();

    let dropped = items.len() - decoded.len();
    if dropped > 0 {
        tracing::debug!(project_id = id, dropped, "Dropped malformed media elements");
        return (decoded, FieldOrigin::Partial { dropped });
    }
    (decoded, origin)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
