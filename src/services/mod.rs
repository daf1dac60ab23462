//! Business logic. Every write runs in one transaction opened here; handlers
//! only translate HTTP in and out.

pub mod catalog_service;
pub mod contact_service;
pub mod owned;
pub mod site_settings_service;
pub mod slider_service;

use sea_orm::ActiveValue::{self, Set};

use crate::errors::ServiceError;
use crate::i18n::{normalize, SlotPatch, Translated};

/// How an update treats fields the payload leaves out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// PUT: the resource's mandatory fields must be supplied
    Replace,
    /// PATCH: only the supplied fields change
    Merge,
}

/// Page-number pagination, `page` starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Row offset of the page, saturating at the largest offset the
    /// database accepts
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.per_page)
            .min(i64::MAX as u64)
    }
}

/// Writes a slot patch into a `<field>_tr` / `<field>_en` column pair
pub fn apply_slots(
    patch: &SlotPatch,
    tr: &mut ActiveValue<Option<String>>,
    en: &mut ActiveValue<Option<String>>,
) {
    if let Some(value) = &patch.tr {
        *tr = Set(value.clone());
    }
    if let Some(value) = &patch.en {
        *en = Set(value.clone());
    }
}

/// Writes an optional plain field when the payload mentioned it
pub fn apply_optional(value: &Option<Option<String>>, column: &mut ActiveValue<Option<String>>) {
    if let Some(value) = value {
        *column = Set(normalize(value.clone()));
    }
}

/// Rejects a bilingual field that ends up with no value in any language
pub fn require_text(
    field: &'static str,
    value: &Translated<String>,
) -> Result<(), ServiceError> {
    if value.is_blank() {
        return Err(ServiceError::invalid_field(field, "This field is required."));
    }
    Ok(())
}

/// Rejects an update in replace mode that leaves out a mandatory field
pub fn require_present(
    mode: WriteMode,
    field: &'static str,
    present: bool,
) -> Result<(), ServiceError> {
    if mode == WriteMode::Replace && !present {
        return Err(ServiceError::invalid_field(field, "This field is required."));
    }
    Ok(())
}
