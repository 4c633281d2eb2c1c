//! Mail errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed")]
    Http(#[from] reqwest::Error),

    #[error("mail API returned {status}")]
    Rejected { status: u16 },
}
