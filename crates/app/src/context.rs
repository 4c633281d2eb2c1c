//! App Context

use std::{path::PathBuf, sync::Arc};

use hmac::digest::InvalidLength;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, PgAuthService, TokenHasher},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        books::{BooksService, PgBooksService},
        carts::{CartsService, PgCartsService},
        categories::{CategoriesService, PgCategoriesService},
        orders::{OrderSettings, OrdersService, PgOrdersService},
        users::{PgUsersService, UsersService},
    },
    mail::{HttpMailer, HttpMailerConfig, LogMailer, Mailer},
    payments::{RazorpayClient, RazorpayConfig},
    storage::LocalImageStore,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid auth token key")]
    TokenKey(#[source] InvalidLength),
}

/// Where uploaded images live and how they are addressed.
#[derive(Debug, Clone)]
pub struct ImageStorageConfig {
    pub dir: PathBuf,
    pub public_base_url: String,
}

/// Everything needed to build an [`AppContext`].
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub auth_token_key: String,
    pub razorpay: RazorpayConfig,

    /// Without an API the mailer only logs.
    pub mail: Option<HttpMailerConfig>,
    pub images: ImageStorageConfig,
    pub orders: OrderSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_max_connections", &self.database_max_connections)
            .field("auth_token_key", &"**redacted**")
            .field("razorpay", &self.razorpay)
            .field("mail", &self.mail)
            .field("images", &self.images)
            .field("orders", &self.orders)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub categories: Arc<dyn CategoriesService>,
    pub books: Arc<dyn BooksService>,
    pub addresses: Arc<dyn AddressesService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or the token key is
    /// rejected.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let hasher =
            TokenHasher::new(config.auth_token_key.as_bytes()).map_err(AppInitError::TokenKey)?;

        let pool = database::connect_with(&config.database_url, config.database_max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let mailer: Arc<dyn Mailer> = match config.mail {
            Some(mail) => Arc::new(HttpMailer::new(mail)),
            None => {
                info!("no mail API configured, outgoing mail will be logged");

                Arc::new(LogMailer)
            }
        };

        let images = Arc::new(LocalImageStore::new(
            config.images.dir,
            config.images.public_base_url,
        ));

        Ok(Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(pool, hasher)),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            books: Arc::new(PgBooksService::new(db.clone(), images)),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                Arc::new(RazorpayClient::new(config.razorpay)),
                mailer,
                config.orders,
            )),
        })
    }
}
