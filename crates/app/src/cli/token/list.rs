use bookshelf_app::{auth::PgAuthService, domain::users::records::UserUuid};
use clap::Args;
use jiff::Timestamp;
use uuid::Uuid;

use super::TokenStoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    #[command(flatten)]
    store: TokenStoreArgs,

    /// UUID of the user whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

fn or_placeholder(value: Option<Timestamp>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), |value| value.to_string())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let (pool, hasher) = args.store.connect().await?;

    let tokens = PgAuthService::new(pool, hasher)
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("token_version: {}", token.version.as_i16());
        println!("created_at: {}", token.created_at);
        println!("last_used_at: {}", or_placeholder(token.last_used_at, "never"));
        println!("expires_at: {}", or_placeholder(token.expires_at, "none"));
        println!("revoked_at: {}", or_placeholder(token.revoked_at, "active"));
        println!();
    }

    Ok(())
}
