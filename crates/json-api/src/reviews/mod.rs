//! Book reviews

mod handlers;
mod models;

pub(crate) use handlers::*;
