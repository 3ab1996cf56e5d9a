//! Account approval and role assignment.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::access::Role;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::users::UserRolesForm;
use crate::repository::DieselRepository;
use crate::routes::{admin_context, redirect, render_template, service_error_response};
use crate::services::ServiceError;
use crate::services::users::{approve_user, list_users, revoke_user, set_roles};

const USERS_PATH: &str = "/admin/users";

#[get("/users")]
pub async fn show_users(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match list_users(repo.get_ref(), &user) {
        Ok(data) => data,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "list_users",
            "/admin/dashboard",
        ),
    };

    let roles = Role::ALL.into_iter().map(Role::as_str).collect::<Vec<_>>();

    let mut context = admin_context(&flash_messages, &user, "users");
    context.insert("users", &data.users);
    context.insert("roles", &roles);

    render_template(&tera, "admin/users.html", &context)
}

#[post("/users/{user_id}/approve")]
pub async fn approve(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match approve_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Conta aprovada.").send();
            redirect(USERS_PATH)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "approve_user", USERS_PATH),
    }
}

#[post("/users/{user_id}/revoke")]
pub async fn revoke(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match revoke_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Acesso revogado.").send();
            redirect(USERS_PATH)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "revoke_user", USERS_PATH),
    }
}

#[post("/users/{user_id}/roles")]
pub async fn save_roles(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let result = UserRolesForm::from_bytes(&body)
        .map_err(ServiceError::from)
        .and_then(|form| set_roles(repo.get_ref(), &user, user_id.into_inner(), form));
    match result {
        Ok(_) => {
            FlashMessage::success("Papéis atualizados.").send();
            redirect(USERS_PATH)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "set_roles", USERS_PATH),
    }
}
