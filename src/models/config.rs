//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the chat-completion API used to translate team profiles.
pub struct TranslationConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_timeout() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    pub secret: String,
    /// Directory where uploaded images are written and served from.
    pub upload_dir: String,
    /// Absolute base URL used in emailed links.
    pub public_base_url: String,
    /// Hostnames allowed to reach `/admin`. `*.suffix` matches subdomains.
    pub admin_hosts: Vec<String>,
    pub zmq_emailer_pub: String,
    pub contact_recipient: String,
    pub firm_name: String,
    /// Registrations with this email are approved as admin right away.
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    #[serde(default)]
    pub secure_cookies: bool,
    pub translation: TranslationConfig,
}
