//! Messages sent through the public contact form.

use serde::Serialize;

use crate::domain::types::{Email, MessageText, PersonName, PhoneNumber, Title};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ContactMessage {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub subject: Title,
    pub message: MessageText,
}

/// Outbound email handed to the emailer service.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

impl ContactMessage {
    /// Notification for the firm followed by the confirmation for the sender.
    pub fn to_emails(&self, firm_address: &str, firm_name: &str) -> [OutgoingEmail; 2] {
        let phone = self
            .phone
            .as_ref()
            .map(PhoneNumber::as_str)
            .unwrap_or("-");
        let notification = OutgoingEmail {
            to: firm_address.to_string(),
            reply_to: Some(self.email.as_str().to_string()),
            subject: format!("Contato pelo site: {}", self.subject),
            body: format!(
                "Nome: {}\nEmail: {}\nTelefone: {}\n\n{}",
                self.name, self.email, phone, self.message
            ),
        };
        let confirmation = OutgoingEmail {
            to: self.email.as_str().to_string(),
            reply_to: Some(firm_address.to_string()),
            subject: format!("{firm_name}: recebemos sua mensagem"),
            body: format!(
                "Olá {},\n\nRecebemos sua mensagem sobre \"{}\" e retornaremos em breve.\n\n{}",
                self.name, self.subject, firm_name
            ),
        };
        [notification, confirmation]
    }
}
