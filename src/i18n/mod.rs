//! Bilingual field storage and request-time language resolution.
//!
//! Every logical text or file field is stored as one column per language
//! (`title_tr`, `title_en`). Reads resolve to the request language with a
//! fallback to [`Language::DEFAULT`]; writes route a flat key into the slot of
//! the request language. The request language travels in [`RequestContext`],
//! never in global state.

pub mod context;
pub mod input;
pub mod language;
pub mod translated;

pub use context::{Localizer, MediaUrls, RequestContext};
pub use input::{nullable, LocalizedInput};
pub use language::{Language, LanguageInfo};
pub use translated::{normalize, SlotPatch, SlotWrite, Translated};
