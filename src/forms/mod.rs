//! Form definitions backing the site routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod contact;
pub mod hearings;
pub mod listings;
pub mod team;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Verifique os campos do formulário: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("E-mail inválido.")]
    InvalidEmail,

    #[error("Nome inválido.")]
    InvalidName,

    #[error("Telefone inválido.")]
    InvalidPhoneNumber,

    #[error("Endereço de imagem inválido.")]
    InvalidUrl,

    #[error("Data e hora inválidas.")]
    InvalidDateTime,

    #[error("Valor inválido.")]
    InvalidPrice,

    #[error("As senhas não conferem.")]
    PasswordMismatch,

    #[error("Campo obrigatório: {0}.")]
    Required(&'static str),

    #[error("Valor não permitido: {0}.")]
    InvalidChoice(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
            TypeConstraintError::InvalidValue(value) => FormError::InvalidChoice(value),
            TypeConstraintError::EmptyString => FormError::Required("texto"),
            TypeConstraintError::NonPositiveId | TypeConstraintError::InvalidToken => {
                FormError::InvalidChoice(err.to_string())
            }
        }
    }
}

/// Treats blank optional inputs as absent.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// HTML checkboxes send a value only when ticked.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1"))
}
