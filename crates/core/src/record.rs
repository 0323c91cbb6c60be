//! The canonical in-memory project entity and its media items.

use serde::{Deserialize, Serialize};

use crate::types::ProjectId;

/// Placeholder shown when a row has no usable name.
pub const NAME_PLACEHOLDER: &str = "Nombre no disponible";

/// Placeholder shown when neither a short nor a long description exists.
pub const SHORT_DESCRIPTION_PLACEHOLDER: &str = "Descripción corta no disponible.";

/// Placeholder shown on the detail page when the long description is missing.
pub const LONG_DESCRIPTION_PLACEHOLDER: &str = "Detalles no disponibles.";

/// Number of characters of the long description kept when deriving a short one.
pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 100;

/// Appended to a truncated long description.
pub const ELLIPSIS: &str = "...";

/// Maipú, Mendoza. Used whenever a row's coordinates cannot be trusted.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: -32.976,
    lng: -68.783,
};

/// A latitude/longitude pair.
///
/// Serialized as a two-element JSON array `[lat, lng]`, which is also how the
/// table stores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and inside the WGS84 latitude/longitude ranges.
    pub fn is_within_range(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Round both components to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        Self {
            lat: (self.lat * factor).round() / factor,
            lng: (self.lng * factor).round() / factor,
        }
    }

    /// Render as `"lat, lng"`.
    pub fn joined(&self) -> String {
        format!("{}, {}", self.lat, self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

/// Kind of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `image/*` content types are images, everything else is treated as video.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            Self::Image
        } else {
            Self::Video
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// One image or video attached to a project.
///
/// Accepts both the stored table shape (`type`, `src`, `alt`) and the
/// camel-case shape (`kind`, `sourceUrl`, `altText`) when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(alias = "type")]
    pub kind: MediaKind,
    #[serde(alias = "sourceUrl", alias = "src")]
    pub source_url: String,
    #[serde(default, alias = "altText", alias = "alt")]
    pub alt_text: String,
}

impl MediaItem {
    pub fn image(source_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            source_url: source_url.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// A normalized real-estate project.
///
/// Built fresh on every store refresh and never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub coordinates: Coordinates,
    pub short_description: String,
    pub long_description: String,
    pub media: Vec<MediaItem>,
}

impl ProjectRecord {
    /// Media items of kind [`MediaKind::Image`], in display order.
    pub fn images(&self) -> impl Iterator<Item = &MediaItem> {
        self.media.iter().filter(|m| m.kind == MediaKind::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_serialize_as_array() {
        let json = serde_json::to_value(Coordinates::new(1.5, -2.0)).unwrap();
        assert_eq!(json, serde_json::json!([1.5, -2.0]));
    }

    #[test]
    fn coordinates_rounding() {
        let c = Coordinates::new(-32.9761234, -68.7839876).rounded(5);
        assert_eq!(c, Coordinates::new(-32.97612, -68.78399));
    }

    #[test]
    fn coordinates_range_check() {
        assert!(DEFAULT_COORDINATES.is_within_range());
        assert!(!Coordinates::new(91.0, 0.0).is_within_range());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_within_range());
    }

    #[test]
    fn media_item_accepts_stored_shape() {
        let item: MediaItem =
            serde_json::from_str(r#"{"type":"video","src":"https://x/v.mp4","alt":"Tour"}"#)
                .unwrap();
        assert_eq!(item.kind, MediaKind::Video);
        assert_eq!(item.source_url, "https://x/v.mp4");
        assert_eq!(item.alt_text, "Tour");
    }

    #[test]
    fn media_item_accepts_camel_case_shape_without_alt() {
        let item: MediaItem = serde_json::from_str(r#"{"kind":"image","sourceUrl":"x"}"#).unwrap();
        assert_eq!(item, MediaItem::image("x", ""));
    }

    #[test]
    fn media_kind_from_content_type() {
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        assert_eq!(
            MediaKind::from_content_type("application/octet-stream"),
            MediaKind::Video
        );
    }
}
