pub mod mailer;
pub mod memory;
pub mod notifications;
pub mod store;
pub mod trips;
