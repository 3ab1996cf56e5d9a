//! Sign-in, registration and password recovery pages under `/admin`.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::emailer::ZmqEmailer;
use crate::forms::auth::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use crate::middleware::LOGIN_PATH;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    DASHBOARD_PATH, base_context, redirect, render_template, service_error_response,
};
use crate::services::ServiceError;
use crate::services::auth::{
    load_password_reset, login, register, request_password_reset, reset_password,
};

const LOGIN_FAILED: &str = "Email ou senha inválidos, ou conta aguardando aprovação.";

#[get("")]
pub async fn admin_root() -> impl Responder {
    redirect(DASHBOARD_PATH)
}

#[get("/login")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(DASHBOARD_PATH);
    }
    let context = base_context(&flash_messages, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn do_login(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match login(repo.get_ref(), form) {
        Ok(user) => match Identity::login(&request.extensions(), user.id.to_string()) {
            Ok(_) => {
                log::info!("User {} signed in", user.id);
                redirect(DASHBOARD_PATH)
            }
            Err(err) => {
                log::error!("Failed to attach identity: {err}");
                FlashMessage::error("Não foi possível iniciar a sessão.").send();
                redirect(LOGIN_PATH)
            }
        },
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(LOGIN_FAILED).send();
            redirect(LOGIN_PATH)
        }
        Err(err) => service_error_response(&repo, None, err, "login", LOGIN_PATH),
    }
}

#[post("/logout")]
pub async fn logout(user: Option<Identity>) -> impl Responder {
    if let Some(user) = user {
        user.logout();
    }
    redirect(LOGIN_PATH)
}

#[get("/register")]
pub async fn show_register(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/register")]
pub async fn do_register(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match register(
        repo.get_ref(),
        form,
        server_config.bootstrap_admin_email.as_deref(),
    ) {
        Ok(user) if user.approved => {
            FlashMessage::success("Conta criada. Você já pode entrar.").send();
            redirect(LOGIN_PATH)
        }
        Ok(_) => {
            FlashMessage::success("Cadastro recebido. Aguarde a aprovação de um administrador.")
                .send();
            redirect(LOGIN_PATH)
        }
        Err(err) => service_error_response(&repo, None, err, "register", "/admin/register"),
    }
}

#[get("/forgot-password")]
pub async fn show_forgot_password(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, "forgot_password");
    render_template(&tera, "auth/forgot_password.html", &context)
}

#[post("/forgot-password")]
pub async fn do_forgot_password(
    repo: web::Data<DieselRepository>,
    emailer: web::Data<ZmqEmailer>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ForgotPasswordForm>,
) -> impl Responder {
    if let Err(err) = request_password_reset(
        repo.get_ref(),
        emailer.get_ref(),
        form,
        &server_config.public_base_url,
    ) {
        log::error!("Password reset request failed: {err}");
    }
    FlashMessage::info("Se o email estiver cadastrado, você receberá um link em instantes.")
        .send();
    redirect(LOGIN_PATH)
}

#[get("/reset-password/{token}")]
pub async fn show_reset_password(
    token: web::Path<String>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if load_password_reset(repo.get_ref(), &token).is_err() {
        FlashMessage::error("Link de redefinição inválido ou expirado.").send();
        return redirect("/admin/forgot-password");
    }
    let mut context = base_context(&flash_messages, "reset_password");
    context.insert("token", token.as_str());
    render_template(&tera, "auth/reset_password.html", &context)
}

#[post("/reset-password/{token}")]
pub async fn do_reset_password(
    token: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ResetPasswordForm>,
) -> impl Responder {
    match reset_password(repo.get_ref(), &token, form) {
        Ok(()) => {
            FlashMessage::success("Senha redefinida. Entre com a nova senha.").send();
            redirect(LOGIN_PATH)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Link de redefinição inválido ou expirado.").send();
            redirect("/admin/forgot-password")
        }
        Err(err) => {
            let back = format!("/admin/reset-password/{token}");
            service_error_response(&repo, None, err, "reset_password", &back)
        }
    }
}
