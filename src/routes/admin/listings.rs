//! Listing catalogue screens for admins and technical staff.

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::access::RouteRequirements;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::Locale;
use crate::dto::listings::{category_choices, status_choices};
use crate::forms::listings::{ListingForm, ListingImagesForm};
use crate::repository::DieselRepository;
use crate::routes::{admin_context, ensure_route, redirect, render_template, service_error_response};
use crate::services::listings::{
    create_listing, delete_listing, list_listings, load_listing, parse_filter, update_listing,
    upload_listing_images,
};
use crate::services::storage::FileStorage;

const LISTINGS_PATH: &str = "/admin/listings";

#[derive(Deserialize)]
struct ListingsQuery {
    category: Option<String>,
    status: Option<String>,
    page: Option<usize>,
}

#[get("/listings")]
pub async fn show_listings(
    params: web::Query<ListingsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = parse_filter(params.category.as_deref(), params.status.as_deref())
        .and_then(|filter| {
            list_listings(repo.get_ref(), &user, filter, params.page.unwrap_or(1))
        });
    let data = match data {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(
                &repo,
                Some(&user),
                err,
                "list_listings",
                "/admin/dashboard",
            );
        }
    };

    let mut context = admin_context(&flash_messages, &user, "listings");
    context.insert("listings", &data.listings);
    context.insert("category", &data.category);
    context.insert("status", &data.status);
    context.insert("categories", &data.categories);
    context.insert("statuses", &data.statuses);

    render_template(&tera, "admin/listings/index.html", &context)
}

#[get("/listings/new")]
pub async fn new_listing(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_route(&user, RouteRequirements::ADMIN_OR_TECNICO) {
        return response;
    }

    let mut context = admin_context(&flash_messages, &user, "listings");
    context.insert("categories", &category_choices(Locale::Pt));
    context.insert("statuses", &status_choices(Locale::Pt));

    render_template(&tera, "admin/listings/form.html", &context)
}

#[post("/listings/new")]
pub async fn add_listing(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ListingForm>,
) -> impl Responder {
    match create_listing(repo.get_ref(), &user, form) {
        Ok(listing) => {
            FlashMessage::success("Anúncio criado.").send();
            redirect(&format!("{LISTINGS_PATH}/{}", listing.id))
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "create_listing",
            "/admin/listings/new",
        ),
    }
}

#[get("/listings/{listing_id}")]
pub async fn show_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let listing = match load_listing(repo.get_ref(), &user, listing_id.into_inner()) {
        Ok(listing) => listing,
        Err(err) => return service_error_response(
            &repo,
            Some(&user),
            err,
            "load_listing",
            LISTINGS_PATH,
        ),
    };

    let mut context = admin_context(&flash_messages, &user, "listings");
    context.insert("price", &listing.price.to_string());
    context.insert("listing", &listing);
    context.insert("categories", &category_choices(Locale::Pt));
    context.insert("statuses", &status_choices(Locale::Pt));

    render_template(&tera, "admin/listings/form.html", &context)
}

#[post("/listings/{listing_id}")]
pub async fn save_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ListingForm>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("{LISTINGS_PATH}/{listing_id}");
    match update_listing(repo.get_ref(), &user, listing_id, form) {
        Ok(_) => {
            FlashMessage::success("Anúncio atualizado.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "update_listing", &back),
    }
}

#[post("/listings/{listing_id}/images")]
pub async fn add_listing_images(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<FileStorage>,
    MultipartForm(form): MultipartForm<ListingImagesForm>,
) -> impl Responder {
    let listing_id = listing_id.into_inner();
    let back = format!("{LISTINGS_PATH}/{listing_id}");
    match upload_listing_images(repo.get_ref(), storage.get_ref(), &user, listing_id, form) {
        Ok(_) => {
            FlashMessage::success("Imagens adicionadas.").send();
            redirect(&back)
        }
        Err(err) => service_error_response(&repo, Some(&user), err, "listing_images", &back),
    }
}

#[post("/listings/{listing_id}/delete")]
pub async fn remove_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_listing(repo.get_ref(), &user, listing_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Anúncio excluído.").send();
            redirect(LISTINGS_PATH)
        }
        Err(err) => service_error_response(
            &repo,
            Some(&user),
            err,
            "delete_listing",
            LISTINGS_PATH,
        ),
    }
}
