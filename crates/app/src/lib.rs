//! Bookshelf application domain, persistence and third-party adapters.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod mail;
pub mod pagination;
pub mod payments;
pub mod storage;
pub mod validation;


mod uuids;

pub use uuids::TypedUuid;
