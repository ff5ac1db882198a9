use std::sync::Arc;

use planner::config::{AppConfig, MailBackend};
use planner::db::{init_pool, run_migrations};
use planner::error::AppError;
use planner::models::email::Email;
use planner::routes::create_router;
use planner::services::{
    mailer::{LogMailer, Mailbox, Mailer, SmtpMailer},
    notifications::Notifications,
    store::SqliteTripStore,
    trips::TripService,
};
use planner::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;

    if let Err(err) = run_migrations(&db).await {
        error!("migration failed: {err:?}");
        return Err(err);
    }

    let mailer: Arc<dyn Mailer> = match config.mail.backend {
        MailBackend::Smtp => {
            info!(
                host = %config.mail.smtp_host,
                port = config.mail.smtp_port,
                "sending mail over smtp"
            );
            Arc::new(SmtpMailer::new(&config.mail.smtp_host, config.mail.smtp_port))
        }
        MailBackend::Log => {
            info!("mail backend is `log`, messages are only written to the log");
            Arc::new(LogMailer)
        }
    };

    let sender_email = Email::parse(&config.mail.from_address)
        .map_err(|err| AppError::Config(format!("invalid MAIL_FROM_ADDRESS: {err}")))?;
    let notifications = Notifications::new(
        Mailbox::new(Some(config.mail.from_name.clone()), sender_email),
        config.api_base_url.clone(),
    );

    let trips = TripService::new(
        Arc::new(SqliteTripStore::new(db.clone())),
        mailer,
        notifications,
    );
    let state = AppState::new(config.clone(), trips);

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,planner=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
