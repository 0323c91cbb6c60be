//! Row shapes exchanged with the hosted `Proyectos` table.
//!
//! [`ProjectRow`] is what a `select *` returns: every field may be missing or
//! null, and the JSON columns may hold native JSON or a JSON-encoded string.
//! Text columns are kept as raw JSON too so one mistyped cell degrades a
//! single field instead of failing the whole select.
//! [`ProjectRowPayload`] is the strict shape written back on insert/update.

use serde::{Deserialize, Serialize};

use crate::record::{Coordinates, MediaItem, MediaKind};

/// A raw row as returned by the table collaborator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectRow {
    pub id: Option<serde_json::Value>,
    pub created_at: Option<serde_json::Value>,
    pub nombre: Option<serde_json::Value>,
    pub map_description: Option<serde_json::Value>,
    pub descripcion: Option<serde_json::Value>,
    pub coordinates: Option<serde_json::Value>,
    pub media: Option<serde_json::Value>,
}

impl ProjectRow {
    /// The row id as a string, if present and scalar.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// A media element in the shape stored in the table's `media` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRow {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub src: String,
    pub alt: String,
}

impl From<&MediaItem> for MediaRow {
    fn from(item: &MediaItem) -> Self {
        Self {
            kind: item.kind,
            src: item.source_url.clone(),
            alt: item.alt_text.clone(),
        }
    }
}

/// Column values written on insert or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRowPayload {
    pub nombre: String,
    pub map_description: String,
    pub descripcion: String,
    pub coordinates: Coordinates,
    pub media: Vec<MediaRow>,
}
