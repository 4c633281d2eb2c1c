use bookshelf_app::auth::PgAuthService;
use clap::Args;
use uuid::Uuid;

use super::TokenStoreArgs;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    #[command(flatten)]
    store: TokenStoreArgs,

    /// Token UUID to revoke
    #[arg(long)]
    token_uuid: Uuid,
}

#[expect(clippy::print_stdout, reason = "CLI output")]
pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let (pool, hasher) = args.store.connect().await?;

    let revoked = PgAuthService::new(pool, hasher)
        .revoke_api_token(args.token_uuid)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    if revoked {
        println!("revoked token {}", args.token_uuid);
    } else {
        println!("token {} was not active", args.token_uuid);
    }

    Ok(())
}
