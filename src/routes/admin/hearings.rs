//! Hearing management screens for lawyers and admins.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::hearing::Hearing;
use crate::dto::hearings::{hearing_status_choices, hearing_type_choices};
use crate::forms::hearings::{HearingForm, HearingStatusForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::share::calendar_response;
use crate::routes::{admin_context, ensure_route, redirect, render_template, service_error_response};
use crate::services::ServiceResult;
use crate::services::hearings::{
    change_status, create_hearing, delete_hearing, export_calendar, list_hearings, load_hearing,
    regenerate_share_token, share_hearing, unshare_hearing, update_hearing,
};

const HEARINGS_PATH: &str = "/admin/hearings";

#[derive(Deserialize)]
struct HearingsQuery {
    status: Option<String>,
    page: Option<usize>,
}

#[get("/hearings")]
pub async fn show_hearings(
    params: web::Query<HearingsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    let data = match list_hearings(repo.get_ref(), &user, params.status.as_deref(), page) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(
                &repo,
                Some(&user),
                err,
                "list_hearings",
                "/admin/dashboard",
            );
        }
    };

    let mut context = admin_context(&flash_messages, &user, "hearings");
    context.insert("hearings", &data.hearings);
    context.insert("status", &data.status);
    context.insert("statuses", &hearing_status_choices());

    render_template(&tera, "admin/hearings/index.html", &context)
}

#[get("/hearings/new")]
pub async fn new_hearing(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_route(&user, RouteRequirements::NOT_TECNICO) {
        return response;
    }

    let mut context = admin_context(&flash_messages, &user, "hearings");
    context.insert("types", &hearing_type_choices());
    context.insert("statuses", &hearing_status_choices());

    render_template(&tera, "admin/hearings/form.html", &context)
}

#[post("/hearings/new")]
pub async fn add_hearing(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<HearingForm>,
) -> impl Responder {
    match create_hearing(repo.get_ref(), &user, form) {
        Ok(hearing) => {
            FlashMessage::success("Audiência cadastrada.").send();
            redirect(&format!("{HEARINGS_PATH}/{}", hearing.id))
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "create_hearing",
            "/admin/hearings/new",
        ),
    }
}

#[get("/hearings/{hearing_id}")]
pub async fn show_hearing(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let hearing = match load_hearing(repo.get_ref(), &user, hearing_id.into_inner()) {
        Ok(hearing) => hearing,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "load_hearing",
            HEARINGS_PATH,
        ),
    };

    let mut context = admin_context(&flash_messages, &user, "hearings");
    context.insert("hearing", &hearing);
    context.insert("types", &hearing_type_choices());
    context.insert("statuses", &hearing_status_choices());
    context.insert("public_base_url", &server_config.public_base_url);

    render_template(&tera, "admin/hearings/form.html", &context)
}

#[post("/hearings/{hearing_id}")]
pub async fn save_hearing(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<HearingForm>,
) -> impl Responder {
    let hearing_id = hearing_id.into_inner();
    let back = format!("{HEARINGS_PATH}/{hearing_id}");
    match update_hearing(repo.get_ref(), &user, hearing_id, form) {
        Ok(_) => {
            FlashMessage::success("Audiência atualizada.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "update_hearing", &back),
    }
}

#[post("/hearings/{hearing_id}/status")]
pub async fn save_hearing_status(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<HearingStatusForm>,
) -> impl Responder {
    let hearing_id = hearing_id.into_inner();
    let back = format!("{HEARINGS_PATH}/{hearing_id}");
    match change_status(repo.get_ref(), &user, hearing_id, form) {
        Ok(hearing) => {
            FlashMessage::success(format!("Status alterado para {}.", hearing.status.label()))
                .send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "hearing_status", &back),
    }
}

fn share_action(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    hearing_id: i32,
    result: ServiceResult<Hearing>,
    success: &str,
) -> actix_web::HttpResponse {
    let back = format!("{HEARINGS_PATH}/{hearing_id}");
    match result {
        Ok(_) => {
            FlashMessage::success(success).send();
            redirect(&back)
        }
        Err(err) => service_error_response(repo, Some(user), err, "hearing_share", &back),
    }
}

#[post("/hearings/{hearing_id}/share")]
pub async fn share(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let hearing_id = hearing_id.into_inner();
    let result = share_hearing(repo.get_ref(), &user, hearing_id);
    share_action(&repo, &user, hearing_id, result, "Link de compartilhamento ativado.")
}

#[post("/hearings/{hearing_id}/unshare")]
pub async fn unshare(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let hearing_id = hearing_id.into_inner();
    let result = unshare_hearing(repo.get_ref(), &user, hearing_id);
    share_action(&repo, &user, hearing_id, result, "Compartilhamento desativado.")
}

#[post("/hearings/{hearing_id}/regenerate-token")]
pub async fn regenerate_token(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let hearing_id = hearing_id.into_inner();
    let result = regenerate_share_token(repo.get_ref(), &user, hearing_id);
    share_action(
        &repo,
        &user,
        hearing_id,
        result,
        "Novo link gerado. O link anterior deixou de funcionar.",
    )
}

#[post("/hearings/{hearing_id}/delete")]
pub async fn remove_hearing(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_hearing(repo.get_ref(), &user, hearing_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Audiência excluída.").send();
            redirect(HEARINGS_PATH)
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "delete_hearing",
            HEARINGS_PATH,
        ),
    }
}

#[get("/hearings/{hearing_id}/calendar.ics")]
pub async fn hearing_calendar(
    hearing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match export_calendar(repo.get_ref(), &user, hearing_id.into_inner(), &server_config.domain) {
        Ok(file) => calendar_response(file),
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "hearing_calendar",
            HEARINGS_PATH,
        ),
    }
}
