use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kitti_api::{
    config, db,
    migrator::Migrator,
    services::{catalog_service::CatalogService, slider_service::SliderService},
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Parser)]
#[command(name = "migration", about = "Kitti database schema management", version)]
struct Cli {
    /// Overrides the configured database URL
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations (default)
    Up {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations, the last one by default
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Print applied and pending migrations
    Status,
    /// Drop every table and reapply all migrations
    Fresh,
    /// Recompute catalog and slider coordinates from parent links
    RebuildTree,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load application config")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    info!("Connecting to database");
    let db = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;

    match cli.command.unwrap_or(Commands::Up { steps: None }) {
        Commands::Up { steps } => {
            Migrator::up(&db, steps).await?;
            info!("Migrations applied");
        }
        Commands::Down { steps } => {
            Migrator::down(&db, Some(steps)).await?;
            info!(steps, "Migrations rolled back");
        }
        Commands::Status => Migrator::status(&db).await?,
        Commands::Fresh => {
            Migrator::fresh(&db).await?;
            info!("Schema recreated");
        }
        Commands::RebuildTree => {
            let db = Arc::new(db);
            let items = CatalogService::new(db.clone()).rebuild_tree().await?;
            let sliders = SliderService::new(db.clone()).rebuild_tree().await?;
            info!(items, sliders, "Tree coordinates recomputed");
            return Ok(());
        }
    }

    db::close_pool(db).await?;
    Ok(())
}
