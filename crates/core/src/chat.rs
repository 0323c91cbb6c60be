//! Prompting and reply classification for the per-project assistant.
//!
//! The assistant only knows what the record says. When it cannot answer it
//! replies with [`NO_INFO_SENTINEL`] and the visitor is handed over to a human
//! through the contact channel.

use serde::{Deserialize, Serialize};

use crate::contact::{question_message, ContactChannel};
use crate::record::ProjectRecord;

/// Exact reply the model is told to give when the context has no answer.
pub const NO_INFO_SENTINEL: &str = "NOINFO";

/// Sent on the visitor's behalf to trigger the opening greeting.
pub const GREETING_MESSAGE: &str = "Hola";

/// Text shown instead of the sentinel.
pub const HAND_OFF_TEXT: &str = "No tengo información específica sobre eso en este proyecto.";

/// Label of the hand-off link.
pub const HAND_OFF_LABEL: &str = "¿Quieres preguntar por WhatsApp?";

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One prior exchange in the conversation, as sent back by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// The final, classified assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatReply {
    Answer { text: String },
    HandOff { text: String, label: String, link: String },
}

impl ChatReply {
    /// Classify the complete streamed text for a question about `record`.
    pub fn classify(
        full_text: &str,
        record: &ProjectRecord,
        question: &str,
        contact: &ContactChannel,
    ) -> Self {
        if full_text.trim() == NO_INFO_SENTINEL {
            Self::HandOff {
                text: HAND_OFF_TEXT.to_string(),
                label: HAND_OFF_LABEL.to_string(),
                link: contact.deep_link(&question_message(&record.name, question)),
            }
        } else {
            Self::Answer {
                text: full_text.to_string(),
            }
        }
    }
}

/// System instruction grounding the assistant in one project.
pub fn system_instruction(record: &ProjectRecord) -> String {
    let name = &record.name;
    let media = if record.media.is_empty() {
        "No hay información multimedia específica.".to_string()
    } else {
        format!("{} imágenes/videos disponibles.", record.media.len())
    };

    format!(
        "Eres un asistente virtual para el proyecto inmobiliario \"{name}\".\n\
         Información disponible sobre \"{name}\":\n\
         - Nombre: {name}\n\
         - Descripción General: {short}\n\
         - Detalles Adicionales: {long}\n\
         - Coordenadas: {coords}\n\
         - Media: {media}\n\
         \n\
         Tu ÚNICA tarea es responder preguntas BASÁNDOTE EXCLUSIVAMENTE en la información anterior sobre \"{name}\".\n\
         Si una pregunta del usuario NO PUEDE SER RESPONDIDA usando la información anterior, responde ÚNICA Y EXACTAMENTE con la frase: \"{NO_INFO_SENTINEL}\". No añadas NADA MÁS que \"{NO_INFO_SENTINEL}\".\n\
         Si SÍ PUEDES responder, hazlo de forma concisa, amigable y como una persona.\n\
         Al iniciar la conversación por primera vez (cuando el usuario envía \"{GREETING_MESSAGE}\" o similar), saluda al usuario y pregúntale en qué puedes ayudarle sobre el proyecto \"{name}\".",
        short = record.short_description,
        long = record.long_description,
        coords = record.coordinates.joined(),
    )
}

/// Prompt for a one-shot short description suggestion.
pub fn short_description_prompt(project_name: &str, keywords: &str) -> String {
    let name = if project_name.trim().is_empty() {
        "un proyecto"
    } else {
        project_name.trim()
    };
    let keywords = if keywords.trim().is_empty() {
        "ninguno"
    } else {
        keywords.trim()
    };
    format!(
        "Genera una descripción atractiva y concisa (1-2 frases) para un proyecto inmobiliario \
         llamado \"{name}\".\n\
         Palabras clave/detalles adicionales: \"{keywords}\".\n\
         Esta descripción se usará en un popup de mapa."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::sample_projects;
    use assert_matches::assert_matches;

    #[test]
    fn sentinel_reply_hands_off_with_encoded_question() {
        let record = sample_projects().remove(0);
        let reply = ChatReply::classify(
            "  NOINFO\n",
            &record,
            "¿Aceptan permutas?",
            &ContactChannel::default(),
        );

        assert_matches!(reply, ChatReply::HandOff { ref text, ref link, .. } => {
            assert_eq!(text, HAND_OFF_TEXT);
            assert!(link.starts_with("whatsapp://send?phone=5492612765652&text=Hola%2C+tengo+una+pregunta"));
            assert!(link.contains("%C2%BFAceptan+permutas%3F"));
        });
    }

    #[test]
    fn sentinel_inside_longer_text_is_an_answer() {
        let record = sample_projects().remove(0);
        let reply = ChatReply::classify(
            "NOINFO, pero puedo decirte que hay lotes.",
            &record,
            "x",
            &ContactChannel::default(),
        );
        assert_matches!(reply, ChatReply::Answer { .. });
    }

    #[test]
    fn system_instruction_embeds_record_context() {
        let record = sample_projects().remove(0);
        let prompt = system_instruction(&record);

        assert!(prompt.contains("- Coordenadas: -32.975, -68.775"));
        assert!(prompt.contains("- Media: 2 imágenes/videos disponibles."));
        assert!(prompt.contains("\"NOINFO\""));
        assert!(prompt.contains(&record.long_description));
    }

    #[test]
    fn system_instruction_without_media() {
        let mut record = sample_projects().remove(0);
        record.media.clear();
        assert!(system_instruction(&record).contains("No hay información multimedia específica."));
    }

    #[test]
    fn suggestion_prompt_defaults() {
        let prompt = short_description_prompt("", " ");
        assert!(prompt.contains("llamado \"un proyecto\""));
        assert!(prompt.contains("\"ninguno\""));
    }

    #[test]
    fn turns_deserialize_from_client_shape() {
        let turn: ChatTurn = serde_json::from_str(r#"{"role":"model","text":"Hola!"}"#).unwrap();
        assert_eq!(turn, ChatTurn::model("Hola!"));
    }
}
