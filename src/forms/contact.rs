//! Public contact form.

use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::ContactMessage;
use crate::domain::types::{Email, MessageText, PersonName, PhoneNumber, Title};
use crate::forms::{FormError, non_blank};

#[derive(Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone: non_blank(&form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(|_| FormError::InvalidPhoneNumber)?,
            subject: Title::new(form.subject).map_err(|_| FormError::Required("assunto"))?,
            message: MessageText::new(form.message).map_err(|_| FormError::Required("mensagem"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_stripped_from_message() {
        let form = ContactForm {
            name: "João".into(),
            email: "joao@example.com".into(),
            phone: String::new(),
            subject: "Consulta".into(),
            message: "<img src=x onerror=alert(1)>Olá".into(),
        };
        let message = ContactMessage::try_from(form).unwrap();
        assert!(!message.message.as_str().contains("onerror"));
        assert!(message.message.as_str().contains("Olá"));
    }

    #[test]
    fn message_of_only_markup_is_rejected() {
        let form = ContactForm {
            name: "João".into(),
            email: "joao@example.com".into(),
            phone: String::new(),
            subject: "Consulta".into(),
            message: "<script>alert(1)</script>".into(),
        };
        assert!(ContactMessage::try_from(form).is_err());
    }
}
