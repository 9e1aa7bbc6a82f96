use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use pim::auth::Actor;
use pim::config::PimConfig;
use pim::database::entities::ProductStatus;
use pim::database::{establish_connection, get_database_url, seed_data, setup_database};
use pim::server;
use pim::services::{ExportService, ImportOptions, ImportService, ProductFilters, ProductService};
use pim::transfer::TransferFormat;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// TOML configuration file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Export products to a file, or stdout
    Export {
        #[clap(short, long, value_enum)]
        format: TransferFormat,
        #[clap(short, long)]
        output: Option<PathBuf>,
        #[clap(short, long)]
        database: Option<String>,
        /// SKU substring
        #[clap(long)]
        search: Option<String>,
        #[clap(long = "type")]
        product_type: Option<String>,
        #[clap(long)]
        status: Option<String>,
        /// Category code
        #[clap(long)]
        category: Option<String>,
        #[clap(long)]
        assigned_to: Option<i32>,
    },
    /// Import products from a file
    Import {
        #[clap(short, long, value_enum)]
        format: TransferFormat,
        #[clap(long)]
        file: PathBuf,
        #[clap(short, long)]
        database: Option<String>,
        /// User id recorded in workflow history
        #[clap(short, long)]
        user: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => PimConfig::load(path)?,
        None => PimConfig::from_env(),
    };

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            if cors_origin.is_some() {
                config.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.port);
            server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                let database = database.unwrap_or(config.database_path);
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                let database = database.unwrap_or(config.database_path);
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::Export {
            format,
            output,
            database,
            search,
            product_type,
            status,
            category,
            assigned_to,
        } => {
            if let Some(database) = database {
                config.database_path = database;
            }
            let db = establish_connection(&get_database_url(Some(&config.database_path))).await?;
            setup_database(&db).await?;

            let status = status
                .map(|s| {
                    ProductStatus::from_str(&s).ok_or_else(|| anyhow!("Unknown status '{}'", s))
                })
                .transpose()?;
            let category_id = match category {
                Some(code) => Some(
                    ProductService::new(db.clone())
                        .find_category_by_code(&code)
                        .await?
                        .ok_or_else(|| anyhow!("Unknown category '{}'", code))?
                        .id,
                ),
                None => None,
            };
            let filters = ProductFilters {
                search,
                product_type,
                status,
                category_id,
                assigned_to,
            };

            let bytes = ExportService::new(db).export(format, &filters).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
        Commands::Import {
            format,
            file,
            database,
            user,
        } => {
            if let Some(database) = database {
                config.database_path = database;
            }
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let db = establish_connection(&get_database_url(Some(&config.database_path))).await?;
            setup_database(&db).await?;
            seed_data::ensure_default_scope(&db, &config.default_store_view, &config.default_locale)
                .await?;

            let actor = user.map(Actor::user).unwrap_or_else(Actor::system);
            let result = ImportService::new(db, ImportOptions::from(&config))
                .import(&bytes, format, &actor)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
