use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use super::{Language, SlotPatch, SlotWrite};

/// Bilingual keys of a write payload, captured with `#[serde(flatten)]`.
///
/// Holds whatever the typed part of the payload did not claim: flat keys
/// (`title`) and explicit slot keys (`title_tr`, `title_en`). A JSON `null`
/// clears the slot it addresses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LocalizedInput(BTreeMap<String, Value>);

impl LocalizedInput {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        )
    }

    fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|value| match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// The raw flat and slot keys for `field`
    pub fn slot_write(&self, field: &str) -> SlotWrite {
        SlotWrite::new(
            self.text(field),
            self.text(&format!("{}_{}", field, Language::Tr.code())),
            self.text(&format!("{}_{}", field, Language::En.code())),
        )
    }

    /// Routes `field` into per-language slot changes for `lang`
    pub fn route(&self, field: &str, lang: Language) -> SlotPatch {
        self.slot_write(field).route(lang)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keeps "absent" and "null" apart on optional payload fields: a missing key
/// stays `None` (through `#[serde(default)]`), an explicit `null` becomes
/// `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
