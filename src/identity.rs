//! Resolves the logged-in back-office user for each request.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::auth::load_authenticated_user;

fn resolve(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let id = identity
        .id()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let user_id: i32 = id
        .parse()
        .map_err(|_| ErrorUnauthorized("malformed identity"))?;

    let repo = req.app_data::<web::Data<DieselRepository>>().ok_or_else(|| {
        log::error!("Repository is not registered as app data");
        ErrorInternalServerError("repository unavailable")
    })?;

    match load_authenticated_user(repo.get_ref(), user_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            log::info!("Session of user {user_id} no longer valid");
            Err(ErrorUnauthorized("account unavailable"))
        }
        Err(err) => {
            log::error!("Failed to load user {user_id}: {err}");
            Err(ErrorInternalServerError("failed to load user"))
        }
    }
}

/// Only approved accounts resolve. Anything else is a `401`, which the
/// [`crate::middleware::RedirectUnauthorized`] middleware turns into a
/// redirect to the login page.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
