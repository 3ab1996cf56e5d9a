//! Forms for signing in, registration, password recovery and profile edits.

use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{Email, PersonName, PhoneNumber};
use crate::domain::user::UpdateProfile;
use crate::forms::{FormError, non_blank};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub password_confirm: String,
}

pub struct RegisterPayload {
    pub name: PersonName,
    pub email: Email,
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.password != form.password_confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(length(min = 8))]
    pub password: String,
    pub password_confirm: String,
}

impl ResetPasswordForm {
    /// Returns the new password once both inputs agree.
    pub fn into_password(self) -> Result<String, FormError> {
        self.validate()?;
        if self.password != self.password_confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(self.password)
    }
}

#[derive(Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl TryFrom<ProfileForm> for UpdateProfile {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let phone = non_blank(&form.phone)
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| FormError::InvalidPhoneNumber)?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            phone,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordForm {
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
    pub confirm_password: String,
}

pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

impl TryFrom<ChangePasswordForm> for ChangePasswordPayload {
    type Error = FormError;

    fn try_from(form: ChangePasswordForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.new_password != form.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Self {
            current_password: form.current_password,
            new_password: form.new_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_mismatched_passwords() {
        let form = RegisterForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "segredo123".into(),
            password_confirm: "segredo124".into(),
        };
        assert!(matches!(
            RegisterPayload::try_from(form),
            Err(FormError::PasswordMismatch)
        ));
    }

    #[test]
    fn register_rejects_short_password() {
        let form = RegisterForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "curta".into(),
            password_confirm: "curta".into(),
        };
        assert!(matches!(
            RegisterPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn blank_phone_is_cleared() {
        let form = ProfileForm {
            name: "Ana Souza".into(),
            phone: "   ".into(),
        };
        let profile = UpdateProfile::try_from(form).unwrap();
        assert!(profile.phone.is_none());
        assert_eq!(profile.name.as_str(), "Ana Souza");
    }
}
