//! Project drafts: the editable state behind the admin form.
//!
//! A draft is opened empty (create) or from a record (edit), receives text
//! updates and staged files, and is turned into a [`SubmitPlan`] once its
//! inputs validate. Network work (uploads, table writes) is driven by the
//! caller from the plan; nothing here performs I/O.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::preview::{PreviewHandle, PreviewKey, PreviewRegistry, StagedFile};
use crate::record::{Coordinates, MediaItem, MediaKind, ProjectRecord};
use crate::row::{MediaRow, ProjectRowPayload};
use crate::types::ProjectId;

/// Decimal places kept for submitted coordinates.
pub const COORDINATE_DECIMALS: i32 = 5;

/// Required text fields, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 3] = ["nombre", "map_description", "descripcion"];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Identifies a draft in the registry.
pub type DraftId = Uuid;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Campos requeridos faltantes: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Formato de coordenadas JSON inválido. Use: [-32.123, -68.456]")]
    InvalidCoordinates,
}

// ---------------------------------------------------------------------------
// Draft media
// ---------------------------------------------------------------------------

/// Where a draft media item's bytes live.
#[derive(Debug)]
pub enum DraftSource {
    /// Already uploaded; carries the public URL.
    Persisted { url: String },
    /// Selected locally and held by the preview registry until submit.
    Staged(PreviewHandle),
}

/// One media entry of a draft, in display order.
#[derive(Debug)]
pub struct DraftMedia {
    pub key: PreviewKey,
    pub kind: MediaKind,
    pub alt_text: String,
    pub source: DraftSource,
}

impl DraftMedia {
    fn persisted(item: &MediaItem) -> Self {
        Self {
            key: Uuid::new_v4(),
            kind: item.kind,
            alt_text: item.alt_text.clone(),
            source: DraftSource::Persisted {
                url: item.source_url.clone(),
            },
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self.source, DraftSource::Staged(_))
    }
}

/// URL under which a staged file can be previewed before upload.
pub fn preview_url(draft: DraftId, key: PreviewKey) -> String {
    format!("/api/v1/admin/drafts/{draft}/media/{key}")
}

/// Storage path for an upload: `<unix-millis>_<name with whitespace runs as "_">`.
pub fn upload_path(file_name: &str, unix_millis: i64) -> String {
    format!("{unix_millis}_{}", WHITESPACE_RUN.replace_all(file_name, "_"))
}

/// Parse the coordinate text input: a JSON array of exactly two numbers.
///
/// Both components are rounded to [`COORDINATE_DECIMALS`] places and must
/// land inside the latitude/longitude ranges.
pub fn parse_coordinates_input(input: &str) -> Result<Coordinates, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(input.trim()).map_err(|_| ValidationError::InvalidCoordinates)?;
    match value.as_array().map(Vec::as_slice) {
        Some([lat, lng]) => match (lat.as_f64(), lng.as_f64()) {
            (Some(lat), Some(lng)) => {
                let coordinates = Coordinates::new(lat, lng).rounded(COORDINATE_DECIMALS);
                if coordinates.is_within_range() {
                    Ok(coordinates)
                } else {
                    Err(ValidationError::InvalidCoordinates)
                }
            }
            _ => Err(ValidationError::InvalidCoordinates),
        },
        _ => Err(ValidationError::InvalidCoordinates),
    }
}

/// Render coordinates the way the text input expects them.
pub fn format_coordinates_input(coordinates: Coordinates) -> String {
    let rounded = coordinates.rounded(COORDINATE_DECIMALS);
    format!("[{}, {}]", rounded.lat, rounded.lng)
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

#[derive(Debug, Validate)]
struct RequiredFields {
    #[validate(length(min = 1))]
    nombre: String,
    #[validate(length(min = 1))]
    map_description: String,
    #[validate(length(min = 1))]
    descripcion: String,
}

/// Partial update of a draft's text inputs. Absent fields are left as is.
#[derive(Debug, Default, Deserialize)]
pub struct DraftUpdate {
    pub name: Option<String>,
    pub coordinates_input: Option<String>,
    /// Set from a map click; overrides `coordinates_input`.
    pub coordinates: Option<Coordinates>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub ai_keywords: Option<String>,
}

/// The editable state of one create or edit session.
#[derive(Debug)]
pub struct ProjectDraft {
    pub id: DraftId,
    pub original_id: Option<ProjectId>,
    pub name: String,
    pub coordinates_input: String,
    pub short_description: String,
    pub long_description: String,
    pub ai_keywords: String,
    pub media: Vec<DraftMedia>,
}

impl ProjectDraft {
    /// An empty draft for a new project.
    pub fn open_create() -> Self {
        Self {
            id: Uuid::new_v4(),
            original_id: None,
            name: String::new(),
            coordinates_input: String::new(),
            short_description: String::new(),
            long_description: String::new(),
            ai_keywords: String::new(),
            media: Vec::new(),
        }
    }

    /// A draft prefilled from an existing record.
    pub fn open_edit(record: &ProjectRecord) -> Self {
        Self {
            original_id: Some(record.id.clone()),
            name: record.name.clone(),
            coordinates_input: format_coordinates_input(record.coordinates),
            short_description: record.short_description.clone(),
            long_description: record.long_description.clone(),
            media: record.media.iter().map(DraftMedia::persisted).collect(),
            ..Self::open_create()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original_id.is_some()
    }

    pub fn apply(&mut self, update: DraftUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(input) = update.coordinates_input {
            self.coordinates_input = input;
        }
        if let Some(coordinates) = update.coordinates {
            self.coordinates_input = format_coordinates_input(coordinates);
        }
        if let Some(short) = update.short_description {
            self.short_description = short;
        }
        if let Some(long) = update.long_description {
            self.long_description = long;
        }
        if let Some(keywords) = update.ai_keywords {
            self.ai_keywords = keywords;
        }
    }

    /// Stage a local file. Alt text defaults to the file name.
    ///
    /// Only the preview registry is touched; nothing is uploaded.
    pub fn add_local_media(
        &mut self,
        registry: &PreviewRegistry,
        file: StagedFile,
        alt_text: Option<String>,
    ) -> PreviewKey {
        let kind = file.kind();
        let alt_text = alt_text
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or_else(|| file.file_name.clone());
        let handle = registry.stage(file);
        let key = handle.key();
        self.media.push(DraftMedia {
            key,
            kind,
            alt_text,
            source: DraftSource::Staged(handle),
        });
        key
    }

    /// Remove an item; a staged item's preview is released with it.
    pub fn remove_media(&mut self, key: PreviewKey) -> bool {
        let before = self.media.len();
        self.media.retain(|m| m.key != key);
        self.media.len() != before
    }

    pub fn staged_count(&self) -> usize {
        self.media.iter().filter(|m| m.is_staged()).count()
    }

    /// Check required fields, then coordinates.
    pub fn validate(&self) -> Result<ValidatedFields, ValidationError> {
        let required = RequiredFields {
            nombre: self.name.trim().to_string(),
            map_description: self.short_description.trim().to_string(),
            descripcion: self.long_description.trim().to_string(),
        };
        if let Err(errors) = required.validate() {
            let failed: HashSet<String> = errors
                .field_errors()
                .into_iter()
                .map(|(field, _)| field.to_string())
                .collect();
            let missing = REQUIRED_FIELDS
                .into_iter()
                .filter(|field| failed.contains(*field))
                .collect();
            return Err(ValidationError::MissingFields(missing));
        }

        let coordinates = parse_coordinates_input(&self.coordinates_input)?;

        Ok(ValidatedFields {
            nombre: required.nombre,
            map_description: required.map_description,
            descripcion: required.descripcion,
            coordinates,
        })
    }

    /// Validate and snapshot everything a submission needs.
    ///
    /// The plan owns copies of the staged bytes, so the draft can stay in its
    /// registry (and survive a failed submission) while uploads run.
    pub fn plan_submit(&self) -> Result<SubmitPlan, ValidationError> {
        let fields = self.validate()?;
        let media = self
            .media
            .iter()
            .filter_map(|m| match &m.source {
                DraftSource::Persisted { url } => Some(PlannedMedia::Ready(MediaItem {
                    kind: m.kind,
                    source_url: url.clone(),
                    alt_text: m.alt_text.clone(),
                })),
                DraftSource::Staged(handle) => match handle.file() {
                    Some(file) => Some(PlannedMedia::Upload {
                        file,
                        kind: m.kind,
                        alt_text: m.alt_text.clone(),
                    }),
                    None => {
                        tracing::warn!(key = %m.key, "Staged file vanished before submit, skipping");
                        None
                    }
                },
            })
            .collect();

        Ok(SubmitPlan {
            original_id: self.original_id.clone(),
            fields,
            media,
        })
    }

    pub fn view(&self) -> DraftView {
        DraftView {
            id: self.id,
            original_id: self.original_id.clone(),
            name: self.name.clone(),
            coordinates_input: self.coordinates_input.clone(),
            short_description: self.short_description.clone(),
            long_description: self.long_description.clone(),
            ai_keywords: self.ai_keywords.clone(),
            media: self
                .media
                .iter()
                .map(|m| DraftMediaView {
                    key: m.key,
                    kind: m.kind,
                    alt_text: m.alt_text.clone(),
                    source_url: match &m.source {
                        DraftSource::Persisted { url } => url.clone(),
                        DraftSource::Staged(_) => preview_url(self.id, m.key),
                    },
                    staged: m.is_staged(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Trimmed, validated text fields plus parsed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    pub nombre: String,
    pub map_description: String,
    pub descripcion: String,
    pub coordinates: Coordinates,
}

/// A media entry as it will be submitted.
#[derive(Debug, Clone)]
pub enum PlannedMedia {
    Ready(MediaItem),
    Upload {
        file: StagedFile,
        kind: MediaKind,
        alt_text: String,
    },
}

/// Everything needed to write a draft, detached from the draft itself.
#[derive(Debug, Clone)]
pub struct SubmitPlan {
    pub original_id: Option<ProjectId>,
    pub fields: ValidatedFields,
    pub media: Vec<PlannedMedia>,
}

impl SubmitPlan {
    /// Build the row payload once every item has a persisted URL.
    pub fn into_payload(self, media: &[MediaItem]) -> ProjectRowPayload {
        ProjectRowPayload {
            nombre: self.fields.nombre,
            map_description: self.fields.map_description,
            descripcion: self.fields.descripcion,
            coordinates: self.fields.coordinates,
            media: media.iter().map(MediaRow::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DraftMediaView {
    pub key: PreviewKey,
    pub kind: MediaKind,
    pub alt_text: String,
    pub source_url: String,
    pub staged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub id: DraftId,
    pub original_id: Option<ProjectId>,
    pub name: String,
    pub coordinates_input: String,
    pub short_description: String,
    pub long_description: String,
    pub ai_keywords: String,
    pub media: Vec<DraftMediaView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::sample_projects;
    use assert_matches::assert_matches;
    use bytes::Bytes;

    fn filled_draft() -> ProjectDraft {
        let mut draft = ProjectDraft::open_create();
        draft.apply(DraftUpdate {
            name: Some("Arenas".into()),
            coordinates_input: Some("[-32.9751234, -68.7759876]".into()),
            short_description: Some("Lotes".into()),
            long_description: Some("Lotes desde 300m²".into()),
            ..Default::default()
        });
        draft
    }

    fn video(name: &str) -> StagedFile {
        StagedFile {
            file_name: name.into(),
            content_type: "video/mp4".into(),
            bytes: Bytes::from_static(b"mp4"),
        }
    }

    #[test]
    fn blank_required_fields_are_all_reported_in_order() {
        let mut draft = filled_draft();
        draft.name = "   ".into();
        draft.long_description = String::new();

        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingFields(vec!["nombre", "descripcion"]))
        );
    }

    #[test]
    fn required_fields_are_checked_before_coordinates() {
        let mut draft = ProjectDraft::open_create();
        draft.coordinates_input = "nope".into();
        assert_matches!(draft.validate(), Err(ValidationError::MissingFields(f)) if f.len() == 3);
    }

    #[test]
    fn coordinates_are_parsed_and_rounded() {
        let fields = filled_draft().validate().unwrap();
        assert_eq!(fields.coordinates, Coordinates::new(-32.97512, -68.77599));
    }

    #[test]
    fn coordinate_input_must_be_two_numbers() {
        for input in [
            "",
            "[1]",
            "[1, 2, 3]",
            "[\"1\", 2]",
            "{\"lat\": 1}",
            "not json",
            "[1e308, 0]",
            "[91, 0]",
            "[0, -180.5]",
        ] {
            assert_eq!(
                parse_coordinates_input(input),
                Err(ValidationError::InvalidCoordinates),
                "{input}"
            );
        }
    }

    #[test]
    fn upload_path_collapses_whitespace() {
        assert_eq!(
            upload_path("vista  aérea\tfinal.jpg", 1_700_000_000_000),
            "1700000000000_vista_aérea_final.jpg"
        );
    }

    #[test]
    fn open_edit_prefills_from_record() {
        let record = sample_projects().remove(0);
        let draft = ProjectDraft::open_edit(&record);

        assert!(draft.is_edit());
        assert_eq!(draft.coordinates_input, "[-32.975, -68.775]");
        assert_eq!(draft.media.len(), 2);
        assert!(draft.media.iter().all(|m| !m.is_staged()));
    }

    #[test]
    fn staging_uses_file_name_as_default_alt() {
        let registry = PreviewRegistry::new();
        let mut draft = filled_draft();
        draft.add_local_media(&registry, video("tour.mp4"), Some("  ".into()));

        assert_eq!(draft.media[0].alt_text, "tour.mp4");
        assert_eq!(draft.media[0].kind, MediaKind::Video);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removing_staged_item_releases_preview() {
        let registry = PreviewRegistry::new();
        let mut draft = filled_draft();
        let key = draft.add_local_media(&registry, video("tour.mp4"), None);

        assert!(draft.remove_media(key));
        assert!(!registry.contains(&key));
        assert!(!draft.remove_media(key));
    }

    #[test]
    fn discarding_draft_releases_all_previews() {
        let registry = PreviewRegistry::new();
        let mut draft = filled_draft();
        draft.add_local_media(&registry, video("a.mp4"), None);
        draft.add_local_media(&registry, video("b.mp4"), None);
        assert_eq!(registry.len(), 2);

        drop(draft);
        assert!(registry.is_empty());
    }

    #[test]
    fn plan_preserves_draft_order() {
        let registry = PreviewRegistry::new();
        let mut draft = ProjectDraft::open_edit(&sample_projects()[0]);
        draft.add_local_media(&registry, video("tour.mp4"), None);
        draft.media.swap(0, 2);

        let plan = draft.plan_submit().unwrap();
        assert_matches!(&plan.media[0], PlannedMedia::Upload { file, .. } if file.file_name == "tour.mp4");
        assert_matches!(&plan.media[1], PlannedMedia::Ready(_));
        assert_matches!(&plan.media[2], PlannedMedia::Ready(_));
        assert_eq!(plan.original_id.as_deref(), Some("arena_maipu_default"));
    }

    #[test]
    fn view_exposes_preview_urls_for_staged_items() {
        let registry = PreviewRegistry::new();
        let mut draft = filled_draft();
        let key = draft.add_local_media(&registry, video("a.mp4"), None);

        let view = draft.view();
        assert_eq!(view.media[0].source_url, preview_url(draft.id, key));
        assert!(view.media[0].staged);
    }

    #[test]
    fn map_click_overrides_coordinate_text() {
        let mut draft = filled_draft();
        draft.apply(DraftUpdate {
            coordinates: Some(Coordinates::new(-33.0000012, -68.5)),
            ..Default::default()
        });
        assert_eq!(draft.coordinates_input, "[-33, -68.5]");
    }
}
