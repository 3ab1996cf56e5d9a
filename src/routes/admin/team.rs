//! Team profile screens and the translation trigger.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde_json::json;
use tera::Tera;

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::Locale;
use crate::forms::team::{TeamMemberForm, TeamPhotoForm};
use crate::repository::DieselRepository;
use crate::routes::{admin_context, ensure_route, redirect, render_template, service_error_response};
use crate::services::ServiceError;
use crate::services::public::practice_areas;
use crate::services::storage::FileStorage;
use crate::services::team::{
    create_member, delete_member, list_team, load_member, update_member, upload_photo,
};
use crate::services::translation::{
    HttpTranslator, TranslationRegistry, start_translation, translation_status,
};

const TEAM_PATH: &str = "/admin/team";

#[get("/team")]
pub async fn show_team(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let team = match list_team(repo.get_ref(), &user) {
        Ok(team) => team,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "list_team",
            "/admin/dashboard",
        ),
    };

    let mut context = admin_context(&flash_messages, &user, "team");
    context.insert("team", &team);

    render_template(&tera, "admin/team/index.html", &context)
}

#[get("/team/new")]
pub async fn new_member(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_route(&user, RouteRequirements::ADMIN) {
        return response;
    }

    let mut context = admin_context(&flash_messages, &user, "team");
    context.insert("areas", &practice_areas(Locale::Pt));

    render_template(&tera, "admin/team/form.html", &context)
}

#[post("/team/new")]
pub async fn add_member(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let result = TeamMemberForm::from_bytes(&body)
        .map_err(ServiceError::from)
        .and_then(|form| create_member(repo.get_ref(), &user, form));
    match result {
        Ok(member) => {
            FlashMessage::success("Perfil criado.").send();
            redirect(&format!("{TEAM_PATH}/{}", member.id))
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "create_member",
            "/admin/team/new",
        ),
    }
}

#[get("/team/{member_id}")]
pub async fn show_member(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    registry: web::Data<TranslationRegistry>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let member_id = member_id.into_inner();
    let member = match load_member(repo.get_ref(), &user, member_id) {
        Ok(member) => member,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "load_member",
            TEAM_PATH,
        ),
    };
    let job = translation_status(&registry, &user, member_id).unwrap_or_default();

    let mut context = admin_context(&flash_messages, &user, "team");
    context.insert("member", &member);
    context.insert("areas", &practice_areas(Locale::Pt));
    context.insert("translation", &job);

    render_template(&tera, "admin/team/form.html", &context)
}

#[post("/team/{member_id}")]
pub async fn save_member(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let member_id = member_id.into_inner();
    let back = format!("{TEAM_PATH}/{member_id}");
    let result = TeamMemberForm::from_bytes(&body)
        .map_err(ServiceError::from)
        .and_then(|form| update_member(repo.get_ref(), &user, member_id, form));
    match result {
        Ok(_) => {
            FlashMessage::success("Perfil atualizado.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "update_member", &back),
    }
}

#[post("/team/{member_id}/photo")]
pub async fn save_photo(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<FileStorage>,
    MultipartForm(form): MultipartForm<TeamPhotoForm>,
) -> impl Responder {
    let member_id = member_id.into_inner();
    let back = format!("{TEAM_PATH}/{member_id}");
    match upload_photo(repo.get_ref(), storage.get_ref(), &user, member_id, form) {
        Ok(_) => {
            FlashMessage::success("Foto atualizada.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "member_photo", &back),
    }
}

#[post("/team/{member_id}/delete")]
pub async fn remove_member(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_member(repo.get_ref(), &user, member_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Perfil excluído.").send();
            redirect(TEAM_PATH)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "delete_member", TEAM_PATH),
    }
}

#[post("/team/{member_id}/translate")]
pub async fn translate_member(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    translator: web::Data<HttpTranslator>,
    registry: web::Data<TranslationRegistry>,
) -> impl Responder {
    let member_id = member_id.into_inner();
    let back = format!("{TEAM_PATH}/{member_id}");
    match start_translation(repo.get_ref(), translator.get_ref(), &registry, &user, member_id) {
        Ok(_) => {
            FlashMessage::info("Tradução iniciada. Recarregue a página em alguns instantes.")
                .send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "translation", &back),
    }
}

/// Polled by the profile page while a job runs.
#[get("/team/{member_id}/translation")]
pub async fn translation_state(
    member_id: web::Path<i32>,
    user: AuthenticatedUser,
    registry: web::Data<TranslationRegistry>,
) -> impl Responder {
    match translation_status(&registry, &user, member_id.into_inner()) {
        Ok(Some(state)) => HttpResponse::Ok().json(state),
        Ok(None) => HttpResponse::Ok().json(json!({ "state": "idle" })),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::warn!("Failed to read translation status: {err}");
            HttpResponse::BadRequest().finish()
        }
    }
}
