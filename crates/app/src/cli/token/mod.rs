use bookshelf_app::{auth::TokenHasher, database};
use clap::{Args, Subcommand};
use sqlx::PgPool;

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    Create(create::CreateTokenArgs),
    List(list::ListTokensArgs),
    Revoke(revoke::RevokeTokenArgs),
}

/// Connection and verifier settings shared by every token command.
#[derive(Debug, Args)]
pub(crate) struct TokenStoreArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Key for the HMAC-SHA256 token verifier
    #[arg(long, env = "AUTH_TOKEN_KEY", hide_env_values = true)]
    auth_token_key: String,
}

impl TokenStoreArgs {
    async fn connect(&self) -> Result<(PgPool, TokenHasher), String> {
        let hasher = TokenHasher::new(self.auth_token_key.as_bytes())
            .map_err(|error| format!("invalid auth token key: {error}"))?;

        let pool = database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok((pool, hasher))
    }
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.command {
        TokenSubcommand::Create(args) => create::run(args).await,
        TokenSubcommand::List(args) => list::run(args).await,
        TokenSubcommand::Revoke(args) => revoke::run(args).await,
    }
}
