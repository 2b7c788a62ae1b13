pub mod cache;
pub mod mailer;
pub mod memory;
