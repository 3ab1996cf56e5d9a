//! HTTP handlers and the helpers they share.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::domain::access::{RouteDecision, RouteRequirements, SessionState, decide};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::Locale;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::error_log::record_error;

pub mod admin;
pub mod auth;
pub mod public;
pub mod share;

pub const DASHBOARD_PATH: &str = "/admin/dashboard";
const LOCALE_COOKIE: &str = "lang";
const GENERIC_ERROR: &str = "Ocorreu um erro inesperado. Tente novamente.";

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders `template`, answering 500 when rendering fails.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: pending alerts and the active page.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Back-office page context with the signed-in user.
pub fn admin_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
) -> Context {
    let mut context = base_context(flash_messages, current_page);
    context.insert("current_user", user);
    context.insert("is_admin", &user.is_admin());
    context.insert("is_tecnico", &user.is_tecnico());
    context
}

/// Public page context with the active locale and firm name.
pub fn public_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    locale: &RequestLocale,
    server_config: &ServerConfig,
) -> Context {
    let mut context = base_context(flash_messages, current_page);
    context.insert("locale", locale.locale.as_str());
    context.insert("firm_name", &server_config.firm_name);
    context
}

/// Evaluates `requirements` for a page that renders without calling a
/// service, redirecting like the route state machine says.
pub fn ensure_route(
    user: &AuthenticatedUser,
    requirements: RouteRequirements,
) -> Result<(), HttpResponse> {
    match decide(SessionState::Authenticated(user.roles), requirements) {
        RouteDecision::Render => Ok(()),
        RouteDecision::RedirectToLogin | RouteDecision::Pending => {
            Err(redirect(crate::middleware::LOGIN_PATH))
        }
        RouteDecision::RedirectToDashboard => {
            FlashMessage::error("Acesso negado.").send();
            Err(redirect(DASHBOARD_PATH))
        }
    }
}

/// Maps a failed back-office action to a flash message and redirect.
/// Unexpected failures are also written to the error log.
pub fn service_error_response(
    repo: &DieselRepository,
    user: Option<&AuthenticatedUser>,
    err: ServiceError,
    context: &str,
    back: &str,
) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Acesso negado.").send();
            redirect(DASHBOARD_PATH)
        }
        ServiceError::NotFound => {
            FlashMessage::error("Registro não encontrado.").send();
            redirect(back)
        }
        ServiceError::Form(message)
        | ServiceError::TypeConstraint(message)
        | ServiceError::Conflict(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Repository(_) | ServiceError::Internal(_) => {
            let message = err.to_string();
            log::error!("{context} failed: {message}");
            record_error(repo, context, &message, user.map(|u| u.id), Some(back));
            FlashMessage::error(GENERIC_ERROR).send();
            redirect(back)
        }
    }
}

/// Fallback for read-only pages that cannot redirect anywhere sensible.
pub fn page_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Unauthorized => redirect(DASHBOARD_PATH),
        other => {
            log::error!("Failed to load page: {other}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Locale of a public request: `?lang=` wins and is remembered in a
/// cookie, otherwise the cookie, otherwise Portuguese.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestLocale {
    pub locale: Locale,
    /// Set when the query string asked for a locale the cookie does not hold.
    remember: bool,
}

impl RequestLocale {
    pub fn from_request_parts(query: &str, cookie: Option<&str>) -> Self {
        let requested = web::Query::<LangQuery>::from_query(query)
            .ok()
            .and_then(|q| q.into_inner().lang)
            .and_then(|lang| lang.parse::<Locale>().ok());
        let stored = cookie.and_then(|value| value.parse::<Locale>().ok());

        match requested {
            Some(locale) => Self {
                locale,
                remember: stored != Some(locale),
            },
            None => Self {
                locale: stored.unwrap_or_default(),
                remember: false,
            },
        }
    }

    /// Attaches the locale cookie when the choice changed.
    pub fn apply(&self, mut response: HttpResponse) -> HttpResponse {
        if self.remember {
            let cookie = Cookie::build(LOCALE_COOKIE, self.locale.as_str())
                .path("/")
                .same_site(SameSite::Lax)
                .max_age(CookieDuration::days(365))
                .finish();
            if let Err(err) = response.add_cookie(&cookie) {
                log::warn!("Failed to set locale cookie: {err}");
            }
        }
        response
    }
}

impl FromRequest for RequestLocale {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cookie = req.cookie(LOCALE_COOKIE);
        ready(Ok(Self::from_request_parts(
            req.query_string(),
            cookie.as_ref().map(Cookie::value),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_map_to_css_classes() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
        assert_eq!(alert_level_to_str(&Level::Info), "info");
    }

    #[test]
    fn query_locale_wins_and_is_remembered() {
        let locale = RequestLocale::from_request_parts("lang=en&page=2", Some("pt"));
        assert_eq!(locale.locale, Locale::En);
        assert!(locale.remember);
    }

    #[test]
    fn cookie_locale_is_used_without_query() {
        let locale = RequestLocale::from_request_parts("page=2", Some("en"));
        assert_eq!(locale.locale, Locale::En);
        assert!(!locale.remember);
    }

    #[test]
    fn unknown_locale_falls_back_to_portuguese() {
        let locale = RequestLocale::from_request_parts("lang=fr", None);
        assert_eq!(locale.locale, Locale::Pt);
        assert!(!locale.remember);
    }
}
