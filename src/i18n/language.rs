use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Content languages with one storage slot per bilingual field.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    Tr,
    En,
}

/// Static metadata for a supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub is_default: bool,
}

impl Language {
    /// Fallback language for reads and for writes without a `lang` parameter
    pub const DEFAULT: Language = Language::Tr;

    pub fn code(self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }

    pub fn info(self) -> LanguageInfo {
        let (name, native_name) = match self {
            Language::Tr => ("Turkish", "Türkçe"),
            Language::En => ("English", "English"),
        };
        LanguageInfo {
            code: self.code(),
            name,
            native_name,
            is_default: self.is_default(),
        }
    }

    /// Strict parse; `None` for anything that is not a supported code.
    pub fn from_code(code: &str) -> Option<Self> {
        code.trim().parse().ok()
    }

    /// Lenient parse used for request parameters: missing or unknown codes
    /// silently select the default language.
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(Self::from_code).unwrap_or(Self::DEFAULT)
    }

    pub fn all() -> impl Iterator<Item = Language> {
        Language::iter()
    }
}
