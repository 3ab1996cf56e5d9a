//! Public contact form delivery.

use crate::domain::contact::ContactMessage;
use crate::emailer::EmailSender;
use crate::forms::contact::ContactForm;
use crate::repository::ErrorLogWriter;
use crate::services::error_log::record_error;
use crate::services::{ServiceError, ServiceResult};

/// Where contact notifications go and how the firm signs its replies.
#[derive(Clone, Debug)]
pub struct ContactSettings {
    pub recipient: String,
    pub firm_name: String,
}

/// Validates the form and sends the firm notification plus the sender
/// confirmation.
pub fn submit_contact<R, S>(
    repo: &R,
    sender: &S,
    settings: &ContactSettings,
    form: ContactForm,
) -> ServiceResult<()>
where
    R: ErrorLogWriter + ?Sized,
    S: EmailSender + ?Sized,
{
    let message = ContactMessage::try_from(form)?;

    for email in message.to_emails(&settings.recipient, &settings.firm_name) {
        if let Err(err) = sender.send(&email) {
            log::error!("Failed to send contact email to {}: {err}", email.to);
            record_error(repo, "contact", &err.to_string(), None, Some("/contato"));
            return Err(ServiceError::Internal(
                "Não foi possível enviar sua mensagem. Tente novamente mais tarde.".to_string(),
            ));
        }
    }

    log::info!("Contact message from {} delivered", message.email);
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::domain::contact::OutgoingEmail;
    use crate::emailer::EmailError;
    use crate::repository::mock::MockRepository;

    #[derive(Default)]
    struct RecordingSender {
        sent: RefCell<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl EmailSender for RecordingSender {
        fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            if self.fail {
                return Err(EmailError::Zmq(zmq::Error::EAGAIN));
            }
            self.sent.borrow_mut().push(email.clone());
            Ok(())
        }
    }

    fn settings() -> ContactSettings {
        ContactSettings {
            recipient: "contato@firma.com.br".to_string(),
            firm_name: "Firma Advogados".to_string(),
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            phone: "+55 11 98765-4321".to_string(),
            subject: "Inventário".to_string(),
            message: "Gostaria de uma consulta.".to_string(),
        }
    }

    /// Both emails go out for a valid submission.
    #[test]
    fn sends_notification_and_confirmation() {
        let repo = MockRepository::new();
        let sender = RecordingSender::default();

        submit_contact(&repo, &sender, &settings(), form()).unwrap();

        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "contato@firma.com.br");
        assert!(sent[0].body.contains("+5511987654321"));
        assert_eq!(sent[1].to, "maria@example.com");
    }

    /// Delivery failures are recorded and reported generically.
    #[test]
    fn send_failure_is_logged() {
        let mut repo = MockRepository::new();
        repo.expect_create_error_log()
            .withf(|entry| entry.context.as_str() == "contact")
            .times(1)
            .returning(|_| Ok(()));
        let sender = RecordingSender {
            fail: true,
            ..Default::default()
        };

        let result = submit_contact(&repo, &sender, &settings(), form());

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    /// Invalid input sends nothing.
    #[test]
    fn invalid_email_sends_nothing() {
        let repo = MockRepository::new();
        let sender = RecordingSender::default();
        let mut invalid = form();
        invalid.email = "not-an-email".to_string();

        let result = submit_contact(&repo, &sender, &settings(), invalid);

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(sender.sent.borrow().is_empty());
    }
}
