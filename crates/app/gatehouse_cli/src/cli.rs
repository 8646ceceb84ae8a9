use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse operator CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Print a random secret suitable for `JWT_SECRET`.
    GenerateSecret {
        /// Number of alphanumeric characters.
        #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u16).range(32..))]
        length: u16,
    },

    /// Create an account directly in the database.
    ///
    /// Set the password through `GATEHOUSE_ACCOUNT_PASSWORD` to keep it out of
    /// shell history and the process list.
    CreateAccount {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// `admin` or `superadmin`.
        #[arg(long, default_value = "admin")]
        role: String,

        #[arg(long, env = "GATEHOUSE_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        #[arg(long, env = "BCRYPT_COST", default_value_t = gatehouse_core::auth::password::DEFAULT_BCRYPT_COST)]
        bcrypt_cost: u32,

        #[arg(long, env = "PASSWORD_MIN_LENGTH", default_value_t = gatehouse_core::accounts::DEFAULT_MIN_PASSWORD_LENGTH)]
        min_password_length: usize,
    },

    /// Validate a token and print its claims as JSON.
    VerifyToken {
        token: String,

        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: String,
    },
}
