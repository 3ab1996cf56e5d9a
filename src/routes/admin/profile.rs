//! Self-service profile and password settings.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{ChangePasswordForm, ProfileForm};
use crate::repository::DieselRepository;
use crate::routes::{admin_context, redirect, render_template, service_error_response};
use crate::services::ServiceError;
use crate::services::auth::{change_password, load_profile, update_profile};

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let profile = match load_profile(repo.get_ref(), &user) {
        Ok(profile) => profile,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "profile",
            "/admin/dashboard",
        ),
    };

    let mut context = admin_context(&flash_messages, &user, "profile");
    context.insert("profile", &profile);

    render_template(&tera, "admin/profile.html", &context)
}

#[post("/profile")]
pub async fn save_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    // The save may back off between retries, so it runs off the worker thread.
    let saved = {
        let repo = repo.clone();
        let user = user.clone();
        web::block(move || update_profile(repo.get_ref(), &user, form)).await
    };
    let saved = saved.unwrap_or_else(|err| Err(ServiceError::Internal(err.to_string())));

    match saved {
        Ok(_) => {
            FlashMessage::success("Perfil atualizado.").send();
            redirect("/admin/profile")
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "profile", "/admin/profile"),
    }
}

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = admin_context(&flash_messages, &user, "settings");
    render_template(&tera, "admin/settings.html", &context)
}

#[post("/settings")]
pub async fn save_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ChangePasswordForm>,
) -> impl Responder {
    match change_password(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("Senha alterada.").send();
            redirect("/admin/settings")
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "change_password",
            "/admin/settings",
        ),
    }
}
