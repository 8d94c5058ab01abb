use clap::Args;
use courses_app::{
    auth::{Role, create_account},
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Login name
    #[arg(long)]
    name: String,

    /// Login password
    #[arg(long, env = "COURSES_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// One of undefined, user, moderator, admin
    #[arg(long, default_value_t = Role::User)]
    role: Role,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let user = create_account(&Db::new(pool), &args.name, &args.password, args.role)
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_name: {}", user.name);
    println!("user_role: {}", user.role);

    Ok(())
}
