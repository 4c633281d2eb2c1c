use bookshelf_app::{
    database::{self, Db},
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        records::{Role, UserUuid},
    },
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Contact email, unique ignoring case
    #[arg(long)]
    email: String,

    /// Display name used in mail
    #[arg(long)]
    username: String,

    /// Role: user or admin
    #[arg(long, default_value = "user")]
    role: Role,
}

#[expect(clippy::print_stdout, reason = "CLI output")]
pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = PgUsersService::new(Db::new(pool))
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            username: args.username,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);

    Ok(())
}
