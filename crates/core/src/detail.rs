//! Project detail page: long description plus a media carousel.

use serde::Serialize;

use crate::contact::{project_interest_message, ContactChannel, ContactLink};
use crate::record::{MediaItem, ProjectRecord};
use crate::types::ProjectId;
use crate::view::ViewEvent;

/// Label of the back affordance.
pub const BACK_LABEL: &str = "Volver al Mapa";

/// Wraparound slide navigation over `len` items.
///
/// A carousel is never built over zero items; callers omit it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    /// `None` when there is nothing to show.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    /// Start at `index`, wrapped into range.
    pub fn starting_at(len: usize, index: usize) -> Option<Self> {
        Self::new(len).map(|c| Self {
            index: index % c.len,
            ..c
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Prev/next controls and dots are only offered for more than one slide.
    pub fn has_controls(&self) -> bool {
        self.len > 1
    }

    pub fn next_index(&self) -> usize {
        (self.index + 1) % self.len
    }

    pub fn prev_index(&self) -> usize {
        (self.index + self.len - 1) % self.len
    }

    pub fn next(&mut self) -> usize {
        self.index = self.next_index();
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = self.prev_index();
        self.index
    }

    /// Jump to a dot. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }
}

/// Serialized carousel state for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView {
    pub current: usize,
    pub total: usize,
    pub slide: MediaItem,
    /// `None` when there is a single slide and no controls are shown.
    pub next: Option<usize>,
    pub prev: Option<usize>,
}

/// Everything the detail page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: ProjectId,
    pub name: String,
    pub long_description: String,
    pub carousel: Option<CarouselView>,
    pub contact: ContactLink,
    pub back_label: &'static str,
}

/// Renders one record and owns its carousel position.
#[derive(Debug, Clone)]
pub struct DetailPresenter {
    record: ProjectRecord,
    carousel: Option<Carousel>,
}

impl DetailPresenter {
    pub fn new(record: ProjectRecord) -> Self {
        let carousel = Carousel::new(record.media.len());
        Self { record, carousel }
    }

    /// Open the carousel at `slide` (wrapped into range).
    pub fn at_slide(record: ProjectRecord, slide: usize) -> Self {
        let carousel = Carousel::starting_at(record.media.len(), slide);
        Self { record, carousel }
    }

    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn next_slide(&mut self) -> Option<usize> {
        self.carousel.as_mut().map(Carousel::next)
    }

    pub fn prev_slide(&mut self) -> Option<usize> {
        self.carousel.as_mut().map(Carousel::prev)
    }

    /// The back affordance.
    pub fn back(&self) -> ViewEvent {
        ViewEvent::BackRequested
    }

    pub fn render(&self, contact: &ContactChannel) -> DetailView {
        let carousel = self.carousel.map(|c| CarouselView {
            current: c.index(),
            total: c.len(),
            slide: self.record.media[c.index()].clone(),
            next: c.has_controls().then(|| c.next_index()),
            prev: c.has_controls().then(|| c.prev_index()),
        });

        DetailView {
            id: self.record.id.clone(),
            name: self.record.name.clone(),
            long_description: self.record.long_description.clone(),
            carousel,
            contact: contact.button(&project_interest_message(&self.record.name)),
            back_label: BACK_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::sample_projects;
    use crate::record::MediaItem;

    fn record_with_media(count: usize) -> ProjectRecord {
        let mut record = sample_projects().remove(0);
        record.media = (0..count)
            .map(|i| MediaItem::image(format!("https://cdn/{i}.jpg"), format!("Foto {i}")))
            .collect();
        record
    }

    #[test]
    fn carousel_wraps_forward_and_backward() {
        let mut c = Carousel::new(3).unwrap();
        assert_eq!(c.prev(), 2);
        assert_eq!(c.next(), 0);
        c.go_to(2);
        assert_eq!(c.next(), 0);
    }

    #[test]
    fn carousel_over_nothing_is_none() {
        assert!(Carousel::new(0).is_none());
        assert!(Carousel::starting_at(0, 4).is_none());
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut c = Carousel::new(2).unwrap();
        assert!(!c.go_to(2));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn single_slide_offers_no_controls() {
        let view = DetailPresenter::new(record_with_media(1)).render(&ContactChannel::default());
        let carousel = view.carousel.unwrap();
        assert_eq!(carousel.total, 1);
        assert_eq!(carousel.next, None);
        assert_eq!(carousel.prev, None);
    }

    #[test]
    fn empty_media_omits_carousel() {
        let mut presenter = DetailPresenter::new(record_with_media(0));
        assert_eq!(presenter.next_slide(), None);
        let view = presenter.render(&ContactChannel::default());
        assert!(view.carousel.is_none());
    }

    #[test]
    fn render_at_slide_wraps_and_links_neighbours() {
        let view = DetailPresenter::at_slide(record_with_media(3), 5)
            .render(&ContactChannel::default());
        let carousel = view.carousel.unwrap();
        assert_eq!(carousel.current, 2);
        assert_eq!(carousel.slide.source_url, "https://cdn/2.jpg");
        assert_eq!(carousel.next, Some(0));
        assert_eq!(carousel.prev, Some(1));
    }

    #[test]
    fn back_raises_back_requested() {
        let presenter = DetailPresenter::new(record_with_media(0));
        assert_eq!(presenter.back(), ViewEvent::BackRequested);
    }

    #[test]
    fn contact_button_mentions_project() {
        let view = DetailPresenter::new(record_with_media(0)).render(&ContactChannel::default());
        assert!(view.contact.href.contains("Arenas+de+Maip%C3%BA"));
    }
}
