use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use examguard::cli::{NewAdmin, create_admin};
use examguard_config::RegistrationConfig;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Parser)]
#[command(name = "examguard-cli")]
#[command(about = "ExamGuard CLI - Administrative tools for ExamGuard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address (optional)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn prompt_admin(
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> anyhow::Result<NewAdmin> {
    let username = match username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };

    let email = match email {
        Some(e) => optional(e),
        None => optional(
            Input::new()
                .with_prompt("Email address (optional)")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read email")?,
        ),
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };
    if password.len() < MIN_PASSWORD_LEN {
        anyhow::bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let first_name = match first_name {
        Some(f) => optional(f),
        None => optional(
            Input::new()
                .with_prompt("First name (optional)")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read first name")?,
        ),
    };

    let last_name = match last_name {
        Some(l) => optional(l),
        None => optional(
            Input::new()
                .with_prompt("Last name (optional)")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read last name")?,
        ),
    };

    Ok(NewAdmin {
        username,
        email,
        password,
        first_name,
        last_name,
    })
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = examguard_db::init_db_pool().await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let admin = prompt_admin(username, email, password, first_name, last_name)?;
            let salt_rounds = RegistrationConfig::from_env().salt_rounds;
            let profile = create_admin(&pool, &admin, salt_rounds)
                .await
                .map_err(|e| e.error)?;

            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", profile.username);
            println!("   ID: {}", profile.id);
        }
        Commands::Migrate => {
            examguard_db::run_migrations(&pool).await?;
            println!("✅ Migrations applied");
        }
    }

    pool.close().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}
