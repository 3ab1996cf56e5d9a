//! Forms for account administration.

use serde::Deserialize;

use crate::domain::access::{Role, RoleSet};
use crate::forms::FormError;

#[derive(Deserialize)]
/// Role checkboxes; an account may hold none of them.
pub struct UserRolesForm {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserRolesForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::InvalidChoice(err.to_string()))
    }
}

impl TryFrom<UserRolesForm> for RoleSet {
    type Error = FormError;

    fn try_from(form: UserRolesForm) -> Result<Self, Self::Error> {
        form.roles
            .iter()
            .map(|role| role.trim().parse::<Role>().map_err(FormError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_roles() {
        let form = UserRolesForm::from_bytes(b"roles=admin&roles=tecnico").unwrap();
        let roles = RoleSet::try_from(form).unwrap();
        assert!(roles.admin && roles.tecnico && !roles.lawyer);
    }

    #[test]
    fn empty_body_clears_roles() {
        let form = UserRolesForm::from_bytes(b"").unwrap();
        assert_eq!(RoleSet::try_from(form).unwrap(), RoleSet::default());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let form = UserRolesForm::from_bytes(b"roles=owner").unwrap();
        assert!(RoleSet::try_from(form).is_err());
    }
}
