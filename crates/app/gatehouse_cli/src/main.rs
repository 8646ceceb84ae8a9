// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use gatehouse_core::accounts::{AccountStore, PgAccountRepository};
use gatehouse_core::auth::password::PasswordHasher;
use gatehouse_core::models::account::NewAccount;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _logger = logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::GenerateSecret { length } => {
            println!("{}", generate_secret(length as usize));
        }
        Commands::CreateAccount {
            name,
            email,
            role,
            password,
            database_url,
            bcrypt_cost,
            min_password_length,
        } => {
            let hasher = PasswordHasher::new(bcrypt_cost)
                .map_err(|e| Error::Custom(format!("BCRYPT_COST: {e}")))?;
            let input = NewAccount::new(name, email, password, role);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let account = runtime.block_on(async {
                let pool = sqlx::PgPool::connect(&database_url).await?;
                gatehouse_core::migrate::migrate(&pool).await?;
                let store = AccountStore::new(
                    Arc::new(PgAccountRepository::new(pool)),
                    hasher,
                    min_password_length,
                );
                Ok::<_, Error>(store.create(input).await?)
            })?;

            log::info!("created {} account {} ({})", account.role, account.email, account.id);
        }
        Commands::VerifyToken { token, secret } => {
            let claims = gatehouse_core::auth::jwt::validate_token(token.trim(), secret.as_bytes())?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
    }

    Ok(())
}

fn generate_secret(length: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_are_alphanumeric_and_distinct() {
        let a = generate_secret(64);
        let b = generate_secret(64);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
