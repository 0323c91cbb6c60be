//! The server-side marker layer kept in step with the project store.

use serde::Serialize;

use huma_core::map::{MapPresenter, MapView, Marker, MarkerId, MarkerLayer};
use huma_core::view::ViewEvent;
use huma_db::ProjectSnapshot;

/// Marker layer plus the store version it was rendered from.
pub struct MapLayer {
    presenter: MapPresenter<MarkerLayer>,
    rendered_version: Option<u64>,
}

/// What `GET /map` returns.
#[derive(Debug, Serialize)]
pub struct MapPayload {
    pub view: MapView,
    pub markers: Vec<Marker>,
    pub version: u64,
}

impl MapLayer {
    pub fn new() -> Self {
        Self {
            presenter: MapPresenter::new(MarkerLayer::new()),
            rendered_version: None,
        }
    }

    /// Re-render if `snapshot` is newer than the last render.
    ///
    /// Returns whether a render happened.
    pub fn sync(&mut self, snapshot: &ProjectSnapshot) -> bool {
        if self.rendered_version == Some(snapshot.version) {
            return false;
        }
        let placed = self.presenter.render(&snapshot.records);
        self.rendered_version = Some(snapshot.version);
        tracing::debug!(placed, version = snapshot.version, "Map markers rendered");
        true
    }

    pub fn select(&self, marker: MarkerId) -> Option<ViewEvent> {
        self.presenter.select(marker)
    }

    pub fn payload(&self) -> MapPayload {
        MapPayload {
            view: MapView::default(),
            markers: self.presenter.surface().markers().to_vec(),
            version: self.rendered_version.unwrap_or_default(),
        }
    }
}

impl Default for MapLayer {
    fn default() -> Self {
        Self::new()
    }
}
