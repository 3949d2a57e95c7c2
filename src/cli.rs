use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::Settings;
use commands::{clear_database, init_database, migrate_and_serve, serve};

#[derive(Parser)]
#[command(name = "tradebook")]
#[command(about = "Tradebook bookkeeping service with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Database URL, e.g. sqlite://tradebook.db?mode=rwc
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Apply pending migrations, then start the web server
    MigrateAndServe {
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: Option<String>,

        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Initialize the database using migrations
    InitDb {
        /// Database URL
        ///
        /// For SQLite databases, use:
        ///   - sqlite:///absolute/path/to/database.sqlite?mode=rwc
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// Delete every row of every table, keeping the schema
    ClearDb {
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Commands::Serve {
                database_url,
                bind_address,
            } => {
                serve(&settings.with_overrides(database_url, bind_address)).await?;
            }
            Commands::MigrateAndServe {
                database_url,
                bind_address,
            } => {
                migrate_and_serve(&settings.with_overrides(database_url, bind_address)).await?;
            }
            Commands::InitDb { database_url } => {
                init_database(&settings.with_overrides(database_url, None).database_url).await?;
            }
            Commands::ClearDb { database_url, yes } => {
                clear_database(&settings.with_overrides(database_url, None).database_url, yes)
                    .await?;
            }
        }
        Ok(())
    }
}
