pub mod categories;
pub mod common;
pub mod contact;
pub mod items;
pub mod products;
pub mod site_settings;
pub mod sliders;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::notifications::Notifier;
use crate::services::{
    catalog_service::CatalogService, contact_service::ContactService,
    site_settings_service::SiteSettingsService, slider_service::SliderService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub sliders: Arc<SliderService>,
    pub site_settings: Arc<SiteSettingsService>,
    pub contact: Arc<ContactService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            sliders: Arc::new(SliderService::new(db.clone())),
            site_settings: Arc::new(SiteSettingsService::new(db.clone())),
            contact: Arc::new(ContactService::new(db, notifier)),
        }
    }
}
