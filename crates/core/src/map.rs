//! Map presentation: one marker per project on a [`MapSurface`].
//!
//! The server keeps a [`MapPresenter`] over an in-memory [`MarkerLayer`] and
//! re-renders it on every store change; the browser draws the layer on top
//! of the tile map described by [`MapView`].

use serde::Serialize;

use crate::record::{Coordinates, ProjectRecord, DEFAULT_COORDINATES};
use crate::types::ProjectId;
use crate::view::ViewEvent;

/// Label of the popup affordance that opens the detail page.
pub const VIEW_PROJECT_LABEL: &str = "Ver Proyecto";

/// Initial zoom level of the public map.
pub const DEFAULT_ZOOM: u8 = 13;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Identifier handed out by a surface for each placed marker.
pub type MarkerId = u64;

/// Content of a marker popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub body: String,
    pub action_label: &'static str,
    pub project_id: ProjectId,
}

impl Popup {
    fn for_record(record: &ProjectRecord) -> Self {
        Self {
            title: record.name.clone(),
            body: record.short_description.clone(),
            action_label: VIEW_PROJECT_LABEL,
            project_id: record.id.clone(),
        }
    }
}

/// Something markers can be placed on and removed from.
pub trait MapSurface {
    fn add_marker(&mut self, position: Coordinates, popup: Popup) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId) -> bool;
}

/// A placed marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinates,
    pub popup: Popup,
}

/// In-memory marker layer, serialized for the browser map.
#[derive(Debug, Default, Serialize)]
pub struct MarkerLayer {
    #[serde(skip)]
    next_id: MarkerId,
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl MapSurface for MarkerLayer {
    fn add_marker(&mut self, position: Coordinates, popup: Popup) -> MarkerId {
        self.next_id += 1;
        let id = self.next_id;
        self.markers.push(Marker { id, position, popup });
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        self.markers.len() != before
    }
}

/// Tile map configuration sent to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_url: &'static str,
    pub attribution: &'static str,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_COORDINATES,
            zoom: DEFAULT_ZOOM,
            tile_url: TILE_URL,
            attribution: TILE_ATTRIBUTION,
        }
    }
}

/// Places project markers on a surface and resolves marker selections.
pub struct MapPresenter<S: MapSurface> {
    surface: S,
    placed: Vec<(MarkerId, ProjectId)>,
}

impl<S: MapSurface> MapPresenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            placed: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Replace every previously placed marker with one per record.
    ///
    /// Returns the number of markers placed.
    pub fn render(&mut self, records: &[ProjectRecord]) -> usize {
        for (marker, _) in self.placed.drain(..) {
            self.surface.remove_marker(marker);
        }

        for record in records {
            if !record.coordinates.is_within_range() {
                tracing::warn!(
                    project_id = %record.id,
                    lat = record.coordinates.lat,
                    lng = record.coordinates.lng,
                    "Project coordinates out of range, not adding marker"
                );
                continue;
            }
            let marker = self
                .surface
                .add_marker(record.coordinates, Popup::for_record(record));
            self.placed.push((marker, record.id.clone()));
        }

        self.placed.len()
    }

    /// Activate the "view project" affordance of a marker's popup.
    pub fn select(&self, marker: MarkerId) -> Option<ViewEvent> {
        self.placed
            .iter()
            .find(|(id, _)| *id == marker)
            .map(|(_, project_id)| ViewEvent::ProjectSelected(project_id.clone()))
    }
}
