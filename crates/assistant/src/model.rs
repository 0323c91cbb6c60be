use async_trait::async_trait;
use futures::stream::BoxStream;

use huma_core::chat::ChatTurn;

use crate::error::AssistantError;

/// Text fragments of a reply, in arrival order.
pub type ReplyStream = BoxStream<'static, Result<String, AssistantError>>;

/// A hosted chat completion model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Stream the reply to `message`, given a system instruction and the
    /// prior turns of the conversation.
    async fn stream_reply(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<ReplyStream, AssistantError>;

    /// Generate a complete reply to a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}
