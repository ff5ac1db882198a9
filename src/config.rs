use std::{env, net::SocketAddr, str::FromStr};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    Smtp,
    Log,
}

impl FromStr for MailBackend {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailBackend::Smtp),
            "log" => Ok(MailBackend::Log),
            other => Err(AppError::Config(format!(
                "invalid MAIL_BACKEND `{other}`, expected `smtp` or `log`"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_name: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Base of the confirmation links embedded in outgoing mail.
    pub api_base_url: Url,
    /// Base of the front-end; confirmations redirect to `{web_base_url}/trips/{id}`.
    pub web_base_url: Url,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://planner.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3333".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let api_base_url = parse_url("API_BASE_URL", "http://localhost:3333")?;
        let web_base_url = parse_url("WEB_BASE_URL", "http://localhost:3000")?;

        let backend = env::var("MAIL_BACKEND")
            .unwrap_or_else(|_| "log".to_string())
            .parse()?;
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid SMTP_PORT: {err}")))?;
        let from_name = env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "plann.er team".to_string());
        let from_address =
            env::var("MAIL_FROM_ADDRESS").unwrap_or_else(|_| "hello@plann.er".to_string());

        Ok(Self {
            database_url,
            listen_addr,
            api_base_url,
            web_base_url,
            mail: MailConfig {
                backend,
                smtp_host,
                smtp_port,
                from_name,
                from_address,
            },
        })
    }

    pub fn trip_page_url(&self, trip_id: &str) -> String {
        join_base(&self.web_base_url, &format!("trips/{trip_id}"))
    }
}

/// Appends `path` to `base`, keeping any path prefix the base already has.
pub fn join_base(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_url(key: &str, default: &str) -> Result<Url, AppError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|err| AppError::Config(format!("invalid {key}: {err}")))
}
