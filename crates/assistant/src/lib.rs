//! Chat completion collaborator: the [`ChatModel`] contract and its Gemini
//! REST implementation.

pub mod config;
pub mod error;
pub mod gemini;
pub mod model;
pub mod sse;

pub use config::GeminiConfig;
pub use error::AssistantError;
pub use gemini::GeminiClient;
pub use model::{ChatModel, ReplyStream};
