//! Authentication

mod errors;
mod hasher;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use hasher::TokenHasher;
pub use models::*;
pub use service::*;
pub use token::*;
