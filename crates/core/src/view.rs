//! View events and the top-level screen controller.

use serde::Serialize;

use crate::types::ProjectId;

/// Events raised by presenters and consumed by the [`Navigator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "project_id", rename_all = "snake_case")]
pub enum ViewEvent {
    /// The "view project" affordance of a map popup or card was activated.
    ProjectSelected(ProjectId),
    /// The detail page's back affordance was activated.
    BackRequested,
    /// The admin link in the footer was activated.
    AdminToggled,
}

/// The screen currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "project_id", rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Map,
    Detail(ProjectId),
    Admin,
}

/// Swaps screens in response to [`ViewEvent`]s.
#[derive(Debug, Default)]
pub struct Navigator {
    screen: Screen,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Apply one event and return the resulting screen.
    pub fn handle(&mut self, event: ViewEvent) -> &Screen {
        self.screen = match (event, &self.screen) {
            (ViewEvent::ProjectSelected(id), _) => Screen::Detail(id),
            (ViewEvent::BackRequested, _) => Screen::Map,
            (ViewEvent::AdminToggled, Screen::Admin) => Screen::Map,
            (ViewEvent::AdminToggled, _) => Screen::Admin,
        };
        &self.screen
    }
}
