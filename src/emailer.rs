//! Outbound email published to the emailer service over ZeroMQ.

use std::sync::Mutex;

use thiserror::Error;

use crate::domain::contact::OutgoingEmail;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("zmq error: {0}")]
    Zmq(#[from] zmq::Error),

    #[error("failed to encode email: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Hands finished emails to whatever delivers them.
pub trait EmailSender {
    fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// PUB socket connected to the emailer. Each message is one JSON frame.
pub struct ZmqEmailer {
    socket: Mutex<zmq::Socket>,
}

impl ZmqEmailer {
    pub fn connect(endpoint: &str) -> Result<Self, EmailError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.connect(endpoint)?;
        log::info!("Connected emailer publisher to {endpoint}");
        Ok(Self {
            socket: Mutex::new(socket),
        })
    }
}

impl EmailSender for ZmqEmailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let payload = serde_json::to_vec(email)?;
        let socket = self
            .socket
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        socket.send(payload, 0)?;
        log::info!("Published email to {}", email.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_encoded_with_wire_field_names() {
        let email = OutgoingEmail {
            to: "contato@firma.com.br".to_string(),
            reply_to: None,
            subject: "Assunto".to_string(),
            body: "Texto".to_string(),
        };
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "to": "contato@firma.com.br",
                "reply_to": null,
                "subject": "Assunto",
                "body": "Texto"
            })
        );
    }
}
