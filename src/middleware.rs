//! Request middleware for the back-office scope.

use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpResponse};

/// Where unauthenticated back-office requests are sent.
pub const LOGIN_PATH: &str = "/admin/login";

type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Whether `host` (as sent in the `Host` header) matches one of the
/// allowed `patterns`. Ports are ignored and the comparison is case
/// insensitive. A `*.suffix` pattern matches any subdomain of `suffix`.
pub fn is_admin_host(host: &str, patterns: &[String]) -> bool {
    let host = strip_port(host.trim()).trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }

    patterns.iter().any(|pattern| {
        let pattern = pattern.trim().to_ascii_lowercase();
        match pattern.strip_prefix("*.") {
            Some(suffix) => host
                .strip_suffix(suffix)
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
            None => host == pattern,
        }
    })
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // Bracketed IPv6 literal, e.g. `[::1]:8080`.
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Sends requests from hosts outside the allow-list back to the public
/// home page.
#[derive(Clone)]
pub struct AdminHostGate {
    patterns: Rc<Vec<String>>,
}

impl AdminHostGate {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: Rc::new(patterns),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminHostGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AdminHostGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminHostGateMiddleware {
            service,
            patterns: Rc::clone(&self.patterns),
        }))
    }
}

pub struct AdminHostGateMiddleware<S> {
    service: S,
    patterns: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for AdminHostGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let host = req.connection_info().host().to_string();
        if !is_admin_host(&host, &self.patterns) {
            log::warn!("Rejected back-office request from host {host}");
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .finish()
                .map_into_right_body();
            let (req, _) = req.into_parts();
            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

/// Turns `401 Unauthorized` responses into a redirect to the login page.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware { service }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish()
                .map_into_right_body();
            let (req, _) = res.into_parts();
            Ok(ServiceResponse::new(req, response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Vec<String> {
        vec!["admin.firma.com.br".to_string(), "*.vercel.app".to_string()]
    }

    #[test]
    fn exact_host_matches_ignoring_port_and_case() {
        assert!(is_admin_host("admin.firma.com.br", &patterns()));
        assert!(is_admin_host("Admin.Firma.com.br:8443", &patterns()));
        assert!(!is_admin_host("firma.com.br", &patterns()));
        assert!(!is_admin_host("evil-admin.firma.com.br", &patterns()));
    }

    #[test]
    fn wildcard_matches_subdomains_only() {
        assert!(is_admin_host("preview-123.vercel.app", &patterns()));
        assert!(is_admin_host("a.b.vercel.app:3000", &patterns()));
        assert!(!is_admin_host("vercel.app", &patterns()));
        assert!(!is_admin_host("notvercel.app", &patterns()));
        assert!(!is_admin_host("vercel.app.evil.com", &patterns()));
    }

    #[test]
    fn ipv6_and_empty_hosts() {
        let allowed = vec!["::1".to_string()];
        assert!(is_admin_host("[::1]:8080", &allowed));
        assert!(!is_admin_host("", &patterns()));
    }
}
