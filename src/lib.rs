//! Law firm website with its back office.
//!
//! The `data` feature exposes the domain model, persistence and calendar
//! export; `server` adds the Actix-web application on top.

pub mod calendar;
pub mod db;
pub mod domain;
mod error_conversions;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod emailer;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod identity;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::db::{establish_connection_pool, run_migrations};
    use crate::emailer::ZmqEmailer;
    use crate::middleware::{AdminHostGate, RedirectUnauthorized};
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::admin::{dashboard, error_logs, hearings, listings, profile, team, users};
    use crate::routes::auth::{
        admin_root, do_forgot_password, do_login, do_register, do_reset_password, logout,
        show_forgot_password, show_login, show_register, show_reset_password,
    };
    use crate::routes::public::{
        not_found, send_contact, show_about, show_area, show_areas, show_contact, show_home,
        show_lawyer, show_listing, show_listings, show_team,
    };
    use crate::routes::share::{shared_hearing_calendar, show_shared_hearing};
    use crate::services::storage::{FileStorage, UPLOADS_PREFIX};
    use crate::services::translation::{HttpTranslator, TranslationRegistry};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;
        let applied = run_migrations(&pool).map_err(std::io::Error::other)?;
        log::info!("Database ready, {applied} migrations applied");

        let repo = DieselRepository::new(pool);

        let emailer = ZmqEmailer::connect(&server_config.zmq_emailer_pub)
            .map_err(|e| std::io::Error::other(format!("Failed to start emailer: {e}")))?;
        let emailer = web::Data::new(emailer);

        let storage = web::Data::new(FileStorage::new(&server_config.upload_dir));
        let registry = web::Data::new(TranslationRegistry::new());
        let translator = HttpTranslator::new(&server_config.translation)
            .map_err(|e| std::io::Error::other(format!("Failed to build translator: {e}")))?;

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(server_config.secure_cookies)
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(Files::new(UPLOADS_PREFIX, &server_config.upload_dir))
                .service(
                    web::scope("/admin")
                        .wrap(RedirectUnauthorized)
                        .wrap(AdminHostGate::new(server_config.admin_hosts.clone()))
                        .service(admin_root)
                        .service(show_login)
                        .service(do_login)
                        .service(logout)
                        .service(show_register)
                        .service(do_register)
                        .service(show_forgot_password)
                        .service(do_forgot_password)
                        .service(show_reset_password)
                        .service(do_reset_password)
                        .service(dashboard::show_dashboard)
                        .service(profile::show_profile)
                        .service(profile::save_profile)
                        .service(profile::show_settings)
                        .service(profile::save_password)
                        .service(hearings::show_hearings)
                        .service(hearings::new_hearing)
                        .service(hearings::add_hearing)
                        .service(hearings::hearing_calendar)
                        .service(hearings::show_hearing)
                        .service(hearings::save_hearing)
                        .service(hearings::save_hearing_status)
                        .service(hearings::share)
                        .service(hearings::unshare)
                        .service(hearings::regenerate_token)
                        .service(hearings::remove_hearing)
                        .service(listings::show_listings)
                        .service(listings::new_listing)
                        .service(listings::add_listing)
                        .service(listings::show_listing)
                        .service(listings::save_listing)
                        .service(listings::add_listing_images)
                        .service(listings::remove_listing)
                        .service(team::show_team)
                        .service(team::new_member)
                        .service(team::add_member)
                        .service(team::show_member)
                        .service(team::save_member)
                        .service(team::save_photo)
                        .service(team::remove_member)
                        .service(team::translate_member)
                        .service(team::translation_state)
                        .service(users::show_users)
                        .service(users::approve)
                        .service(users::revoke)
                        .service(users::save_roles)
                        .service(error_logs::show_error_logs)
                        .service(error_logs::export_error_logs)
                        .service(error_logs::clear),
                )
                .service(show_shared_hearing)
                .service(shared_hearing_calendar)
                .service(show_home)
                .service(show_areas)
                .service(show_area)
                .service(show_team)
                .service(show_lawyer)
                .service(show_listings)
                .service(show_listing)
                .service(show_about)
                .service(show_contact)
                .service(send_contact)
                .default_service(web::to(not_found))
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
                .app_data(web::Data::new(translator.clone()))
                .app_data(emailer.clone())
                .app_data(storage.clone())
                .app_data(registry.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
