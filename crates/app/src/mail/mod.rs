//! Outgoing mail.

mod errors;
mod http;
mod log;
mod mailer;
pub mod templates;

pub use errors::MailError;
pub use http::{HttpMailer, HttpMailerConfig};
pub use log::LogMailer;
pub use mailer::*;
