//! Public marketing pages.

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::emailer::ZmqEmailer;
use crate::forms::contact::ContactForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    RequestLocale, page_error_response, public_context, redirect, render_template,
};
use crate::services::ServiceError;
use crate::services::contact::{ContactSettings, submit_contact};
use crate::services::listings::{list_public_listings, load_public_listing, parse_public_filter};
use crate::services::public::{load_area, load_home, practice_areas};
use crate::services::team::{list_public_team, load_public_member};

#[get("/")]
pub async fn show_home(
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match load_home(repo.get_ref(), locale.locale) {
        Ok(data) => data,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "home", &locale, &server_config);
    context.insert("areas", &data.areas);
    context.insert("team", &data.team);
    context.insert("listings", &data.listings);

    locale.apply(render_template(&tera, "public/home.html", &context))
}

#[get("/areas")]
pub async fn show_areas(
    locale: RequestLocale,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = public_context(&flash_messages, "areas", &locale, &server_config);
    context.insert("areas", &practice_areas(locale.locale));

    locale.apply(render_template(&tera, "public/areas.html", &context))
}

#[get("/areas/{area_id}")]
pub async fn show_area(
    area_id: web::Path<String>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match load_area(repo.get_ref(), &area_id, locale.locale) {
        Ok(data) => data,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "areas", &locale, &server_config);
    context.insert("area", &data.area);
    context.insert("lawyers", &data.lawyers);

    locale.apply(render_template(&tera, "public/area.html", &context))
}

#[get("/equipe")]
pub async fn show_team(
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let team = match list_public_team(repo.get_ref(), locale.locale) {
        Ok(team) => team,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "team", &locale, &server_config);
    context.insert("team", &team);

    locale.apply(render_template(&tera, "public/team.html", &context))
}

#[get("/equipe/{lawyer_id}")]
pub async fn show_lawyer(
    lawyer_id: web::Path<i32>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let member = match load_public_member(repo.get_ref(), lawyer_id.into_inner(), locale.locale) {
        Ok(member) => member,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "team", &locale, &server_config);
    context.insert("lawyer", &member);

    locale.apply(render_template(&tera, "public/lawyer.html", &context))
}

#[derive(Deserialize)]
struct ListingsQuery {
    category: Option<String>,
    status: Option<String>,
    page: Option<usize>,
}

#[get("/oportunidades")]
pub async fn show_listings(
    params: web::Query<ListingsQuery>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filter = parse_public_filter(params.category.as_deref(), params.status.as_deref());
    let page = params.page.unwrap_or(1);

    let data = match list_public_listings(repo.get_ref(), filter, page, locale.locale) {
        Ok(data) => data,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "listings", &locale, &server_config);
    context.insert("listings", &data.listings);
    context.insert("category", &data.category);
    context.insert("status", &data.status);
    context.insert("categories", &data.categories);
    context.insert("statuses", &data.statuses);

    locale.apply(render_template(&tera, "public/listings.html", &context))
}

#[get("/oportunidades/{listing_id}")]
pub async fn show_listing(
    listing_id: web::Path<i32>,
    locale: RequestLocale,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let listing = match load_public_listing(repo.get_ref(), listing_id.into_inner(), locale.locale)
    {
        Ok(listing) => listing,
        Err(err) => return page_error_response(err),
    };

    let mut context = public_context(&flash_messages, "listings", &locale, &server_config);
    context.insert("listing", &listing);

    locale.apply(render_template(&tera, "public/listing.html", &context))
}

#[get("/sobre")]
pub async fn show_about(
    locale: RequestLocale,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = public_context(&flash_messages, "about", &locale, &server_config);
    locale.apply(render_template(&tera, "public/about.html", &context))
}

#[get("/contato")]
pub async fn show_contact(
    locale: RequestLocale,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = public_context(&flash_messages, "contact", &locale, &server_config);
    locale.apply(render_template(&tera, "public/contact.html", &context))
}

#[post("/contato")]
pub async fn send_contact(
    repo: web::Data<DieselRepository>,
    emailer: web::Data<ZmqEmailer>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    let settings = ContactSettings {
        recipient: server_config.contact_recipient.clone(),
        firm_name: server_config.firm_name.clone(),
    };

    match submit_contact(repo.get_ref(), emailer.get_ref(), &settings, form) {
        Ok(()) => {
            FlashMessage::success("Mensagem enviada. Retornaremos em breve.").send();
        }
        Err(ServiceError::Form(message) | ServiceError::Internal(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to submit contact form: {err}");
            FlashMessage::error("Não foi possível enviar sua mensagem.").send();
        }
    }
    redirect("/contato")
}

/// Catch-all for unknown public paths.
pub async fn not_found(
    locale: RequestLocale,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let context = public_context(&flash_messages, "not_found", &locale, &server_config);
    let body = match tera.render("public/not_found.html", &context) {
        Ok(body) => body,
        Err(err) => {
            log::error!("Failed to render not found page: {err}");
            String::new()
        }
    };
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
