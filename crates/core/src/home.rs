//! Landing page content: hero slides and the project card grid.

use serde::Serialize;

use crate::contact::{ContactChannel, ContactLink, GENERIC_MESSAGE};
use crate::detail::Carousel;
use crate::record::{MediaItem, ProjectRecord};
use crate::types::ProjectId;

/// Thumbnail used for cards whose project has no media.
pub const DEFAULT_CARD_IMAGE: &str = "https://picsum.photos/seed/default_card/400/300";

/// Shown instead of the grid when there are no projects.
pub const EMPTY_GRID_MESSAGE: &str = "Actualmente no hay proyectos para mostrar.";

/// Seconds between automatic hero slide changes.
pub const HERO_AUTOPLAY_SECS: u64 = 5;

fn fallback_hero_slides() -> Vec<MediaItem> {
    vec![
        MediaItem::image(
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?q=80&w=2070&auto=format&fit=crop",
            "Vista de un desarrollo inmobiliario moderno",
        ),
        MediaItem::image(
            "https://images.unsplash.com/photo-1582407947304-fd86f028f716?q=80&w=1992&auto=format&fit=crop",
            "Exterior de una casa residencial de lujo",
        ),
        MediaItem::image(
            "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?q=80&w=2070&auto=format&fit=crop",
            "Interior espacioso y luminoso de una casa moderna",
        ),
    ]
}

/// One entry of the project grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub name: String,
    pub short_description: String,
    pub thumbnail: MediaItem,
}

impl ProjectCard {
    pub fn for_record(record: &ProjectRecord) -> Self {
        let thumbnail = record
            .media
            .first()
            .cloned()
            .unwrap_or_else(|| MediaItem::image(DEFAULT_CARD_IMAGE, format!("Vista de {}", record.name)));
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            short_description: record.short_description.clone(),
            thumbnail,
        }
    }
}

/// Hero carousel content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroView {
    pub slides: Vec<MediaItem>,
    pub current: usize,
    pub next: Option<usize>,
    pub prev: Option<usize>,
    pub autoplay_secs: Option<u64>,
}

/// Everything the landing page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub hero: HeroView,
    pub cards: Vec<ProjectCard>,
    pub empty_message: Option<&'static str>,
    pub contact: ContactLink,
}

impl HomeView {
    /// Build from the current list; the first (newest) record is featured.
    pub fn build(records: &[ProjectRecord], hero_slide: usize, contact: &ContactChannel) -> Self {
        let featured_images: Vec<MediaItem> = records
            .first()
            .map(|featured| featured.images().cloned().collect())
            .unwrap_or_default();

        let slides = if featured_images.len() > 1 {
            featured_images
        } else {
            fallback_hero_slides()
        };

        let hero = match Carousel::starting_at(slides.len(), hero_slide) {
            Some(c) if c.has_controls() => HeroView {
                current: c.index(),
                next: Some(c.next_index()),
                prev: Some(c.prev_index()),
                autoplay_secs: Some(HERO_AUTOPLAY_SECS),
                slides,
            },
            _ => HeroView {
                current: 0,
                next: None,
                prev: None,
                autoplay_secs: None,
                slides,
            },
        };

        Self {
            hero,
            cards: records.iter().map(ProjectCard::for_record).collect(),
            empty_message: records.is_empty().then_some(EMPTY_GRID_MESSAGE),
            contact: contact.button(GENERIC_MESSAGE),
        }
    }
}
