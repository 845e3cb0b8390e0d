use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use kinder_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "kinder-cli")]
#[command(about = "Kinder CLI - Administrative tools for Kinder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake programs, groups, staff, parents and children
    Seed {
        /// Number of educational programs to create
        #[arg(long, default_value = "3")]
        programs: usize,

        /// Number of groups per program
        #[arg(long, default_value = "2")]
        groups: usize,

        /// Number of employees (at most one per qualification)
        #[arg(long, default_value = "10")]
        employees: usize,

        /// Number of parents
        #[arg(long, default_value = "20")]
        parents: usize,

        /// Number of children per group
        #[arg(long, default_value = "10")]
        children: usize,

        /// Password shared by every seeded account
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let pool = kinder_db::init_db_pool().await;
    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(&pool, username, password).await
        }
        Commands::Seed {
            programs,
            groups,
            employees,
            parents,
            children,
            password,
        } => {
            let config = SeedConfig::new(programs)
                .with_groups(groups)
                .with_employees(employees)
                .with_parents(parents)
                .with_children(children);
            handle_seed(&pool, config, &password).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .interact_text()
            .expect("Failed to read username")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match seeder::create_admin(pool, &username, &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", username);
            println!("   Id: {}", id);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, config: SeedConfig, password: &str) {
    if let Err(e) = seeder::seed_all(pool, config, password).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
