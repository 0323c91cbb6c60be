//! Domain logic for the projects site: record normalization, presenters for
//! the map, detail and home pages, draft editing and assistant prompting.
//!
//! Nothing in this crate performs network I/O.

pub mod chat;
pub mod contact;
pub mod detail;
pub mod error;
pub mod fallback;
pub mod form;
pub mod home;
pub mod map;
pub mod normalize;
pub mod preview;
pub mod record;
pub mod row;
pub mod types;
pub mod view;
