//! Messaging links that hand a visitor over to a human.

use serde::Serialize;
use url::form_urlencoded;

/// Sales line used when no other number is configured.
pub const DEFAULT_CONTACT_PHONE: &str = "+5492612765652";

/// Message prefilled by the site-wide contact button.
pub const GENERIC_MESSAGE: &str = "Hola, estoy interesado/a en los proyectos inmobiliarios.";

/// Message prefilled by a project's contact button.
pub fn project_interest_message(project_name: &str) -> String {
    format!("Hola, estoy interesado/a en el proyecto \"{project_name}\". Quisiera más información.")
}

/// Message prefilled when the assistant cannot answer a question.
pub fn question_message(project_name: &str, question: &str) -> String {
    format!("Hola, tengo una pregunta sobre el proyecto \"{project_name}\": {question}")
}

/// A ready-to-render contact affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLink {
    pub label: &'static str,
    pub href: String,
}

/// A messaging channel identified by a phone number.
#[derive(Debug, Clone)]
pub struct ContactChannel {
    digits: String,
}

impl ContactChannel {
    /// Build a channel from a phone number in any common notation.
    pub fn new(phone: &str) -> Self {
        Self {
            digits: phone.chars().filter(char::is_ascii_digit).collect(),
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// App deep link: `whatsapp://send?phone=<number>&text=<message>`.
    pub fn deep_link(&self, message: &str) -> String {
        format!(
            "whatsapp://send?phone={}&text={}",
            self.digits,
            encode(message)
        )
    }

    /// Web link: `https://wa.me/<number>?text=<message>`.
    pub fn web_link(&self, message: &str) -> String {
        format!("https://wa.me/{}?text={}", self.digits, encode(message))
    }

    /// The "Contactar por WhatsApp" button.
    pub fn button(&self, message: &str) -> ContactLink {
        ContactLink {
            label: "Contactar por WhatsApp",
            href: self.web_link(message),
        }
    }
}

impl Default for ContactChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CONTACT_PHONE)
    }
}

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}
