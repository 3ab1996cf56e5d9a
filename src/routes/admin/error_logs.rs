//! Browsing, exporting and clearing recorded failures.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::admin::PageQuery;
use crate::routes::{admin_context, redirect, render_template, service_error_response};
use crate::services::error_log::{clear_error_logs, export_error_logs_csv, list_error_logs};

const ERROR_LOGS_PATH: &str = "/admin/error-logs";

#[get("/error-logs")]
pub async fn show_error_logs(
    params: web::Query<PageQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match list_error_logs(repo.get_ref(), &user, params.page.unwrap_or(1)) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(
                &repo,
                Some(&user),
                err,
                "list_error_logs",
                "/admin/dashboard",
            );
        }
    };

    let mut context = admin_context(&flash_messages, &user, "error_logs");
    context.insert("entries", &data.entries);

    render_template(&tera, "admin/error_logs.html", &context)
}

#[get("/error-logs/export.csv")]
pub async fn export_error_logs(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_error_logs_csv(repo.get_ref(), &user) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("error-logs.csv".to_string())],
            })
            .body(body),
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "export_error_logs",
            ERROR_LOGS_PATH,
        ),
    }
}

#[post("/error-logs/clear")]
pub async fn clear(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    match clear_error_logs(repo.get_ref(), &user) {
        Ok(removed) => {
            FlashMessage::success(format!("{removed} registros removidos.")).send();
            redirect(ERROR_LOGS_PATH)
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "clear_error_logs",
            ERROR_LOGS_PATH,
        ),
    }
}
