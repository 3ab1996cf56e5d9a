//! Sign-in, registration, password recovery and self-service profile.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::access::{Role, RoleSet, RouteRequirements};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::contact::OutgoingEmail;
use crate::domain::types::{Email, UserId};
use crate::domain::user::{NewUser, PasswordReset, UpdateProfile, User};
use crate::emailer::EmailSender;
use crate::forms::auth::{
    ChangePasswordForm, ChangePasswordPayload, ForgotPasswordForm, LoginForm, ProfileForm,
    RegisterForm, RegisterPayload, ResetPasswordForm,
};
use crate::repository::{ErrorLogWriter, UserReader, UserWriter};
use crate::services::error_log::record_error;
use crate::services::password::{hash_password, verify_password};
use crate::services::retry::{DEFAULT_ATTEMPTS, with_retry};
use crate::services::{ServiceError, ServiceResult, ensure_access};

/// Lifetime of a password reset link.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Resolves the session's user id into an approved user with roles.
/// Deleted and unapproved accounts resolve to `None`.
pub fn load_authenticated_user<R>(
    repo: &R,
    user_id: i32,
) -> ServiceResult<Option<AuthenticatedUser>>
where
    R: UserReader + ?Sized,
{
    let Ok(id) = UserId::new(user_id) else {
        return Ok(None);
    };
    let found = repo.get_user_with_roles(id)?;
    Ok(found
        .filter(|entry| entry.user.approved)
        .map(|entry| AuthenticatedUser::from((entry.user, entry.roles))))
}

/// Verifies the credentials. Unknown email, wrong password and unapproved
/// accounts all fail with the same [`ServiceError::Unauthorized`].
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let Ok(email) = Email::new(form.email) else {
        return Err(ServiceError::Unauthorized);
    };

    let Some(credentials) = repo.get_credentials_by_email(&email)? else {
        log::info!("Login attempt for unknown email {email}");
        return Err(ServiceError::Unauthorized);
    };

    if !verify_password(&form.password, &credentials.password_hash) {
        log::info!("Wrong password for user {}", credentials.user.id);
        return Err(ServiceError::Unauthorized);
    }

    if !credentials.user.approved {
        log::info!("Login of unapproved user {}", credentials.user.id);
        return Err(ServiceError::Unauthorized);
    }

    load_authenticated_user(repo, credentials.user.id.get())?.ok_or(ServiceError::Unauthorized)
}

/// Creates an account awaiting approval. The configured bootstrap address
/// is approved as admin right away.
pub fn register<R>(
    repo: &R,
    form: RegisterForm,
    bootstrap_admin_email: Option<&str>,
) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let payload = RegisterPayload::try_from(form)?;

    if repo.get_user_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Conflict(
            "Este email já está cadastrado.".to_string(),
        ));
    }

    let is_bootstrap = bootstrap_admin_email
        .and_then(|address| Email::new(address).ok())
        .is_some_and(|address| address == payload.email);

    let roles = if is_bootstrap {
        [Role::Admin].into_iter().collect()
    } else {
        RoleSet::default()
    };

    let new_user = NewUser {
        email: payload.email,
        name: payload.name,
        password_hash: hash_password(&payload.password)?,
        approved: is_bootstrap,
        roles,
    };

    let user = repo.create_user(&new_user).map_err(|err| {
        if err.is_unique_violation() {
            return ServiceError::Conflict("Este email já está cadastrado.".to_string());
        }
        log::error!("Failed to create user: {err}");
        ServiceError::from(err)
    })?;

    if is_bootstrap {
        log::info!("Bootstrap admin {} registered", user.email);
    } else {
        log::info!("User {} registered and awaits approval", user.id);
    }
    Ok(user)
}

fn reset_email(to: &Email, link: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.as_str().to_string(),
        reply_to: None,
        subject: "Redefinição de senha".to_string(),
        body: format!(
            "Recebemos um pedido para redefinir sua senha.\n\n\
             Acesse o link abaixo em até {RESET_TOKEN_TTL_MINUTES} minutos:\n{link}\n\n\
             Se você não fez este pedido, ignore esta mensagem."
        ),
    }
}

/// Issues a reset link when the email belongs to an account. Always
/// succeeds so the form does not reveal which addresses exist.
pub fn request_password_reset<R, S>(
    repo: &R,
    sender: &S,
    form: ForgotPasswordForm,
    base_url: &str,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ErrorLogWriter + ?Sized,
    S: EmailSender + ?Sized,
{
    let Ok(email) = Email::new(form.email) else {
        return Ok(());
    };

    let user = match repo.get_user_by_email(&email) {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::info!("Password reset requested for unknown email {email}");
            return Ok(());
        }
        Err(err) => {
            log::error!("Failed to look up user for password reset: {err}");
            record_error(repo, "password_reset", &err.to_string(), None, None);
            return Ok(());
        }
    };

    let reset = PasswordReset {
        token: Uuid::new_v4().simple().to_string(),
        user_id: user.id,
        expires_at: Utc::now().naive_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    };
    if let Err(err) = repo.create_password_reset(&reset) {
        log::error!("Failed to store password reset: {err}");
        record_error(repo, "password_reset", &err.to_string(), Some(user.id), None);
        return Ok(());
    }

    let link = format!(
        "{}/admin/reset-password/{}",
        base_url.trim_end_matches('/'),
        reset.token
    );
    if let Err(err) = sender.send(&reset_email(&user.email, &link)) {
        log::error!("Failed to send password reset email: {err}");
        record_error(repo, "password_reset", &err.to_string(), Some(user.id), None);
    }
    Ok(())
}

/// Returns the reset request behind `token` while it is still valid.
pub fn load_password_reset<R>(repo: &R, token: &str) -> ServiceResult<PasswordReset>
where
    R: UserReader + ?Sized,
{
    let reset = repo
        .get_password_reset(token)?
        .ok_or(ServiceError::NotFound)?;
    if reset.is_expired(Utc::now().naive_utc()) {
        return Err(ServiceError::NotFound);
    }
    Ok(reset)
}

pub fn reset_password<R>(repo: &R, token: &str, form: ResetPasswordForm) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    let reset = load_password_reset(repo, token)?;
    let password = form.into_password()?;
    let hash = hash_password(&password)?;

    repo.complete_password_reset(reset.user_id, &hash)?;
    log::info!("Password of user {} reset", reset.user_id);
    Ok(())
}

pub fn load_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    ensure_access(user, RouteRequirements::AUTHENTICATED)?;
    repo.get_user_by_id(user.id)?.ok_or(ServiceError::NotFound)
}

/// Saves name and phone, retrying when the database is briefly busy.
pub fn update_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProfileForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::AUTHENTICATED)?;

    let profile = UpdateProfile::try_from(form)?;
    let updated = with_retry(DEFAULT_ATTEMPTS, || repo.update_profile(user.id, &profile)).map_err(
        |err| {
            log::error!("Failed to update profile of user {}: {err}", user.id);
            err
        },
    )?;
    Ok(updated)
}

pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ChangePasswordForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_access(user, RouteRequirements::AUTHENTICATED)?;

    let payload = ChangePasswordPayload::try_from(form)?;
    let credentials = repo
        .get_credentials_by_id(user.id)?
        .ok_or(ServiceError::NotFound)?;

    if !verify_password(&payload.current_password, &credentials.password_hash) {
        return Err(ServiceError::Form("Senha atual incorreta.".to_string()));
    }

    let hash = hash_password(&payload.new_password)?;
    repo.update_password(user.id, &hash)?;
    log::info!("User {} changed their password", user.id);
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::domain::user::{UserCredentials, UserWithRoles};
    use crate::emailer::EmailError;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[derive(Default)]
    struct RecordingSender {
        sent: RefCell<Vec<OutgoingEmail>>,
    }

    impl EmailSender for RecordingSender {
        fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            self.sent.borrow_mut().push(email.clone());
            Ok(())
        }
    }

    fn stored(approved: bool) -> User {
        let now = Utc::now().naive_utc();
        User::try_new(
            3,
            "ana@firma.com.br".to_string(),
            "Ana".to_string(),
            None,
            approved,
            now,
            now,
        )
        .unwrap()
    }

    fn repo_with_password(password: &str, approved: bool) -> MockRepository {
        let hash = hash_password(password).unwrap();
        let mut repo = MockRepository::new();
        repo.expect_get_credentials_by_email().returning(move |_| {
            Ok(Some(UserCredentials {
                user: stored(approved),
                password_hash: hash.clone(),
            }))
        });
        repo.expect_get_user_with_roles().returning(move |_| {
            Ok(Some(UserWithRoles {
                user: stored(approved),
                roles: [Role::Lawyer].into_iter().collect(),
            }))
        });
        repo
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "Ana@Firma.com.br".to_string(),
            password: password.to_string(),
        }
    }

    /// Correct credentials of an approved account sign in with roles.
    #[test]
    fn approved_user_logs_in() {
        let repo = repo_with_password("segredo123", true);

        let user = login(&repo, login_form("segredo123")).unwrap();

        assert_eq!(user.id.get(), 3);
        assert!(user.roles.lawyer);
    }

    /// The right password is not enough while approval is pending.
    #[test]
    fn unapproved_user_cannot_log_in() {
        let repo = repo_with_password("segredo123", false);

        assert!(matches!(
            login(&repo, login_form("segredo123")),
            Err(ServiceError::Unauthorized)
        ));
    }

    /// A wrong password fails the same way.
    #[test]
    fn wrong_password_is_unauthorized() {
        let repo = repo_with_password("segredo123", true);

        assert!(matches!(
            login(&repo, login_form("outra-senha")),
            Err(ServiceError::Unauthorized)
        ));
    }

    /// Sessions of revoked accounts no longer resolve.
    #[test]
    fn revoked_session_is_anonymous() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_with_roles().returning(|_| {
            Ok(Some(UserWithRoles {
                user: stored(false),
                roles: RoleSet::default(),
            }))
        });

        assert_eq!(load_authenticated_user(&repo, 3).unwrap(), None);
    }

    /// Regular registrations wait for approval without roles.
    #[test]
    fn registration_is_pending() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|user| !user.approved && user.roles == RoleSet::default())
            .times(1)
            .returning(|_| Ok(stored(false)));
        let form = RegisterForm {
            name: "Ana".to_string(),
            email: "ana@firma.com.br".to_string(),
            password: "segredo123".to_string(),
            password_confirm: "segredo123".to_string(),
        };

        register(&repo, form, Some("socio@firma.com.br")).unwrap();
    }

    /// The bootstrap address becomes an approved admin.
    #[test]
    fn bootstrap_admin_is_approved() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_create_user()
            .withf(|user| user.approved && user.roles.admin)
            .times(1)
            .returning(|_| Ok(stored(true)));
        let form = RegisterForm {
            name: "Sócio".to_string(),
            email: "SOCIO@firma.com.br".to_string(),
            password: "segredo123".to_string(),
            password_confirm: "segredo123".to_string(),
        };

        register(&repo, form, Some("socio@firma.com.br")).unwrap();
    }

    /// Unknown addresses get the same answer and no email.
    #[test]
    fn reset_for_unknown_email_is_silent() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_create_password_reset().times(0);
        let sender = RecordingSender::default();

        request_password_reset(
            &repo,
            &sender,
            ForgotPasswordForm {
                email: "ninguem@firma.com.br".to_string(),
            },
            "https://firma.com.br",
        )
        .unwrap();

        assert!(sender.sent.borrow().is_empty());
    }

    /// Known addresses receive a one hour link.
    #[test]
    fn reset_link_is_emailed() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_| Ok(Some(stored(true))));
        repo.expect_create_password_reset()
            .withf(|reset| {
                let ttl = reset.expires_at - Utc::now().naive_utc();
                reset.token.len() == 32 && ttl > Duration::minutes(59)
            })
            .times(1)
            .returning(|_| Ok(()));
        let sender = RecordingSender::default();

        request_password_reset(
            &repo,
            &sender,
            ForgotPasswordForm {
                email: "ana@firma.com.br".to_string(),
            },
            "https://firma.com.br/",
        )
        .unwrap();

        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("https://firma.com.br/admin/reset-password/"));
    }

    /// Expired links are treated as unknown.
    #[test]
    fn expired_reset_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_password_reset().returning(|token| {
            Ok(Some(PasswordReset {
                token: token.to_string(),
                user_id: UserId::new(3).unwrap(),
                expires_at: Utc::now().naive_utc() - Duration::minutes(1),
            }))
        });
        repo.expect_complete_password_reset().times(0);

        let form = ResetPasswordForm {
            password: "novasenha1".to_string(),
            password_confirm: "novasenha1".to_string(),
        };
        assert!(matches!(
            reset_password(&repo, "abc", form),
            Err(ServiceError::NotFound)
        ));
    }

    /// Profile saves survive a transient database failure.
    #[test]
    fn profile_update_is_retried() {
        let mut repo = MockRepository::new();
        let mut calls = 0;
        repo.expect_update_profile().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(RepositoryError::ConnectionError("busy".to_string()))
            } else {
                Ok(stored(true))
            }
        });
        let user = AuthenticatedUser::from((stored(true), RoleSet::default()));
        let form = ProfileForm {
            name: "Ana Paula".to_string(),
            phone: String::new(),
        };

        update_profile(&repo, &user, form).unwrap();
    }
}
