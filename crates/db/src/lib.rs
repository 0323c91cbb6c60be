//! Access to the hosted project table and media bucket, plus the in-memory
//! [`ProjectStore`] built on top of them.

pub mod client;
pub mod config;
pub mod error;
pub mod remote;
pub mod store;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::{ClientBuildError, TransportError};
pub use remote::{ObjectStorage, ProjectTable};
pub use store::{ListOrigin, ProjectSnapshot, ProjectStore};
