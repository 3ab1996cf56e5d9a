use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{admin_context, page_error_response, render_template};
use crate::services::dashboard::load_dashboard;

#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match load_dashboard(repo.get_ref(), &user) {
        Ok(data) => data,
        Err(err) => return page_error_response(err),
    };

    let mut context = admin_context(&flash_messages, &user, "dashboard");
    context.insert("dashboard", &data);

    render_template(&tera, "admin/dashboard.html", &context)
}
