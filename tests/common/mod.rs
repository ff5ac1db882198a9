#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use planner::{
    config::{AppConfig, MailBackend, MailConfig},
    error::AppError,
    models::email::Email,
    services::{
        mailer::{DeliveryReceipt, MailMessage, Mailbox, Mailer},
        memory::MemoryTripStore,
        notifications::Notifications,
        trips::TripService,
    },
    state::AppState,
};
use url::Url;

/// Records every message; refuses the listed recipients.
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<MailMessage>>,
    refused: Mutex<Vec<String>>,
}

impl Outbox {
    pub fn refuse(&self, address: &str) {
        self.refused.lock().unwrap().push(address.to_string());
    }

    pub fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .map(|m| m.to.email.to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, message: &MailMessage) -> Result<DeliveryReceipt, AppError> {
        self.sent.lock().unwrap().push(message.clone());
        let refused = self
            .refused
            .lock()
            .unwrap()
            .iter()
            .any(|a| a == message.to.email.as_str());
        if refused {
            return Err(AppError::Mail(format!("{} refused", message.to.email)));
        }
        Ok(DeliveryReceipt::generate(&message.from.email))
    }
}

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        api_base_url: Url::parse("http://localhost:3333").unwrap(),
        web_base_url: Url::parse("http://localhost:3000").unwrap(),
        mail: MailConfig {
            backend: MailBackend::Log,
            smtp_host: "localhost".into(),
            smtp_port: 1025,
            from_name: "plann.er team".into(),
            from_address: "hello@plann.er".into(),
        },
    }
}

pub fn notifications(config: &AppConfig) -> Notifications {
    Notifications::new(
        Mailbox::new(
            Some(config.mail.from_name.clone()),
            Email::parse(&config.mail.from_address).unwrap(),
        ),
        config.api_base_url.clone(),
    )
}

pub struct Harness {
    pub store: MemoryTripStore,
    pub outbox: Arc<Outbox>,
    pub trips: TripService,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let config = test_config("sqlite::memory:");
        let store = MemoryTripStore::new();
        let outbox = Arc::new(Outbox::default());
        let trips = TripService::new(
            Arc::new(store.clone()),
            outbox.clone(),
            notifications(&config),
        );
        let state = AppState::new(config, trips.clone());
        Self {
            store,
            outbox,
            trips,
            state,
        }
    }
}

pub fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}
