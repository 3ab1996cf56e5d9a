//! Public, token-addressed view of a shared hearing.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::calendar::CalendarFile;
use crate::dto::hearings::HearingView;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{RequestLocale, public_context};
use crate::services::ServiceError;
use crate::services::error_log::record_error;
use crate::services::hearings::{export_shared_calendar, load_shared_hearing};

/// One page for every unusable token, whatever the reason.
fn invalid_link(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    locale: &RequestLocale,
    server_config: &ServerConfig,
) -> HttpResponse {
    let context = public_context(flash_messages, "shared_hearing", locale, server_config);
    match tera.render("share/invalid.html", &context) {
        Ok(body) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render invalid link page: {err}");
            HttpResponse::NotFound().finish()
        }
    }
}

/// Failures other than an unknown token are logged, then answered like one.
fn share_failure(
    repo: &DieselRepository,
    err: ServiceError,
    context: &str,
    invalid: impl FnOnce() -> HttpResponse,
) -> HttpResponse {
    if !matches!(err, ServiceError::NotFound) {
        log::error!("{context} failed: {err}");
        record_error(repo, context, &err.to_string(), None, None);
    }
    invalid()
}

pub fn calendar_response(file: CalendarFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CalendarFile::CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.content)
}

#[get("/audiencia/{token}")]
pub async fn show_shared_hearing(
    token: web::Path<String>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_shared_hearing(repo.get_ref(), &token) {
        Ok(hearing) => {
            let mut context =
                public_context(&flash_messages, "shared_hearing", &locale, &server_config);
            context.insert("hearing", &HearingView::from(hearing));
            context.insert("token", token.as_str());
            match tera.render("share/hearing.html", &context) {
                Ok(body) => HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(body),
                Err(err) => {
                    log::error!("Failed to render shared hearing: {err}");
                    HttpResponse::InternalServerError().finish()
                }
            }
        }
        Err(err) => share_failure(&repo, err, "shared_hearing", || {
            invalid_link(&tera, &flash_messages, &locale, &server_config)
        }),
    }
}

#[get("/audiencia/{token}/calendario.ics")]
pub async fn shared_hearing_calendar(
    token: web::Path<String>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match export_shared_calendar(repo.get_ref(), &token, &server_config.domain) {
        Ok(file) => calendar_response(file),
        Err(err) => share_failure(&repo, err, "shared_calendar", || {
            invalid_link(&tera, &flash_messages, &locale, &server_config)
        }),
    }
}
