//! Streaming per-project assistant chat.
//!
//! The reply is sent as server-sent events:
//!
//! ```text
//! event: fragment   data: <text>          zero or more, in order
//! event: reply      data: <ChatReply>     once, after the last fragment
//! event: error      data: <message>       instead of `reply` if the stream breaks
//! ```

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;

use huma_core::chat::{system_instruction, ChatReply, ChatTurn, GREETING_MESSAGE};

use crate::error::{AppError, AppResult};
use crate::handlers::find_project;
use crate::state::AppState;

/// Sent to the visitor when the stream fails midway.
pub const CHAT_ERROR_MESSAGE: &str = "Hubo un error al obtener la respuesta. Inténtalo de nuevo.";

#[derive(Debug, Deserialize)]
pub struct ChatInput {
    /// The visitor's question. Absent or blank opens the conversation with a greeting.
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

fn event(name: &str, data: &str) -> Result<Event, Infallible> {
    // SSE cannot carry carriage returns.
    Ok(Event::default().event(name).data(data.replace('\r', "")))
}

/// POST /api/v1/projects/{id}/chat
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChatInput>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let assistant = state
        .assistant
        .clone()
        .ok_or(AppError::AssistantUnavailable)?;
    let record = find_project(&state, &id)?;

    let question = input
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GREETING_MESSAGE.to_string());

    let mut fragments = assistant
        .stream_reply(&system_instruction(&record), &input.history, &question)
        .await?;
    tracing::debug!(project_id = %record.id, turns = input.history.len(), "Chat reply streaming");

    let contact = state.contact.clone();
    let stream = async_stream::stream! {
        let mut full = String::new();
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(text) => {
                    full.push_str(&text);
                    yield event("fragment", &text);
                }
                Err(e) => {
                    tracing::error!(project_id = %record.id, error = %e, "Chat stream failed");
                    yield event("error", CHAT_ERROR_MESSAGE);
                    return;
                }
            }
        }

        let reply = ChatReply::classify(&full, &record, &question, &contact);
        if matches!(reply, ChatReply::HandOff { .. }) {
            tracing::info!(project_id = %record.id, "Chat handed off to contact channel");
        }
        match Event::default().event("reply").json_data(&reply) {
            Ok(ev) => yield Ok(ev),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode chat reply");
                yield event("error", CHAT_ERROR_MESSAGE);
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
