use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kitti_api::{
    config, db,
    i18n::Language,
    services::{
        site_settings_service::{SiteSettingsInput, SiteSettingsService},
        Page,
    },
};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-defaults",
    about = "Creates the default site settings record when none exists",
    version
)]
struct Cli {
    /// Create another record even if one already exists
    #[arg(long)]
    force: bool,
}

fn default_settings() -> Result<SiteSettingsInput> {
    let input = serde_json::from_value(json!({
        "site_title_tr": "Kitti",
        "site_title_en": "Kitti",
        "site_description_tr": "Kitti resmi web sitesi",
        "site_description_en": "Official Kitti website",
        "menu_items": [
            {"href": "/", "text_tr": "Ana Sayfa", "text_en": "Home"},
            {"href": "/products", "text_tr": "Ürünler", "text_en": "Products"},
            {"href": "/contact", "text_tr": "İletişim", "text_en": "Contact"}
        ],
        "footer_info": {
            "footer_text_tr": "Tüm hakları saklıdır.",
            "footer_text_en": "All rights reserved.",
            "social_text_tr": "Bizi takip edin",
            "social_text_en": "Follow us"
        }
    }))
    .context("default site settings payload is invalid")?;
    Ok(input)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load application config")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    if cfg.auto_migrate {
        db::run_migrations(&pool).await?;
    }
    let service = SiteSettingsService::new(Arc::new(pool));

    let (_, existing) = service.list(Page::new(1, 1)).await?;
    if existing > 0 && !cli.force {
        info!(existing, "Site settings already present; nothing to do");
        return Ok(());
    }

    let bundle = service.create(default_settings()?, Language::DEFAULT).await?;
    info!(id = bundle.site.id, "Default site settings created");
    Ok(())
}
