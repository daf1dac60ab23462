use serde::{Deserialize, Serialize};

use super::Language;

/// Collapses empty and whitespace-only input to absence so that a blank
/// value never hides the default-language fallback.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// One logical field backed by a storage slot per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translated<T> {
    pub tr: Option<T>,
    pub en: Option<T>,
}

impl<T> Translated<T> {
    pub fn new(tr: Option<T>, en: Option<T>) -> Self {
        Self { tr, en }
    }

    pub fn get(&self, lang: Language) -> Option<&T> {
        match lang {
            Language::Tr => self.tr.as_ref(),
            Language::En => self.en.as_ref(),
        }
    }

    pub fn set(&mut self, lang: Language, value: Option<T>) {
        match lang {
            Language::Tr => self.tr = value,
            Language::En => self.en = value,
        }
    }

    pub fn into_slots(self) -> (Option<T>, Option<T>) {
        (self.tr, self.en)
    }
}

impl<T: AsRef<str>> Translated<T> {
    /// Read resolution: the requested slot if non-empty, else the default
    /// language slot if non-empty, else nothing.
    pub fn resolve(&self, lang: Language) -> Option<&str> {
        fn filled<S: AsRef<str>>(slot: Option<&S>) -> Option<&str> {
            slot.map(AsRef::as_ref).filter(|v| !v.trim().is_empty())
        }
        filled(self.get(lang)).or_else(|| filled(self.get(Language::DEFAULT)))
    }

    pub fn is_blank(&self) -> bool {
        self.resolve(Language::DEFAULT).is_none() && self.resolve(Language::En).is_none()
    }
}

impl<'a> Translated<&'a str> {
    /// Borrowing view over a pair of stored columns
    pub fn of(tr: &'a Option<String>, en: &'a Option<String>) -> Self {
        Self::new(tr.as_deref(), en.as_deref())
    }
}

/// Raw client input for one logical field: the flat key (`title`) and the
/// explicit slot keys (`title_tr`, `title_en`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotWrite {
    pub generic: Option<String>,
    pub tr: Option<String>,
    pub en: Option<String>,
}

impl SlotWrite {
    pub fn new(generic: Option<String>, tr: Option<String>, en: Option<String>) -> Self {
        Self { generic, tr, en }
    }

    /// Write resolution. The flat key lands in the slot of the request
    /// language only; explicit slot keys address their slot directly and win
    /// over the flat key when both target the same slot.
    pub fn route(self, lang: Language) -> SlotPatch {
        let mut patch = SlotPatch::default();
        if let Some(value) = self.generic {
            patch.set(lang, normalize(Some(value)));
        }
        if let Some(value) = self.tr {
            patch.tr = Some(normalize(Some(value)));
        }
        if let Some(value) = self.en {
            patch.en = Some(normalize(Some(value)));
        }
        patch
    }
}

/// Per-slot changes. The outer `None` leaves a slot untouched, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub tr: Option<Option<String>>,
    pub en: Option<Option<String>>,
}

impl SlotPatch {
    fn set(&mut self, lang: Language, value: Option<String>) {
        match lang {
            Language::Tr => self.tr = Some(value),
            Language::En => self.en = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tr.is_none() && self.en.is_none()
    }

    /// The field as it will look once the patch is written
    pub fn applied_to(&self, current: Translated<String>) -> Translated<String> {
        let mut next = current;
        if let Some(value) = &self.tr {
            next.tr = value.clone();
        }
        if let Some(value) = &self.en {
            next.en = value.clone();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(tr: Option<&str>, en: Option<&str>) -> Translated<String> {
        Translated::new(tr.map(String::from), en.map(String::from))
    }

    #[test]
    fn resolve_prefers_requested_slot() {
        let t = title(Some("Kedi"), Some("Cat"));
        assert_eq!(t.resolve(Language::En), Some("Cat"));
        assert_eq!(t.resolve(Language::Tr), Some("Kedi"));
    }

    #[test]
    fn resolve_falls_back_to_default_language() {
        let t = title(Some("Kedi"), None);
        assert_eq!(t.resolve(Language::En), Some("Kedi"));
    }

    #[test]
    fn resolve_does_not_fall_back_away_from_default() {
        let t = title(None, Some("Cat"));
        assert_eq!(t.resolve(Language::Tr), None);
        assert_eq!(t.resolve(Language::En), Some("Cat"));
    }

    #[test]
    fn stored_empty_string_does_not_suppress_fallback() {
        let t = title(Some("Kedi"), Some("  "));
        assert_eq!(t.resolve(Language::En), Some("Kedi"));
        assert_eq!(title(None, None).resolve(Language::En), None);
    }

    #[test]
    fn generic_key_routes_to_request_language_only() {
        let patch = SlotWrite::new(Some("Cat".into()), None, None).route(Language::En);
        assert_eq!(patch.en, Some(Some("Cat".into())));
        assert_eq!(patch.tr, None);
    }

    #[test]
    fn explicit_slot_key_wins_over_generic_key() {
        let patch = SlotWrite::new(Some("generic".into()), Some("Kedi".into()), None)
            .route(Language::Tr);
        assert_eq!(patch.tr, Some(Some("Kedi".into())));
    }

    #[test]
    fn empty_write_clears_slot() {
        let patch = SlotWrite::new(Some("".into()), None, None).route(Language::En);
        assert_eq!(patch.en, Some(None));
        let next = patch.applied_to(title(Some("Kedi"), Some("Cat")));
        assert_eq!(next, title(Some("Kedi"), None));
        assert_eq!(next.resolve(Language::En), Some("Kedi"));
    }

    #[test]
    fn untouched_patch_keeps_current_value() {
        let patch = SlotWrite::default().route(Language::En);
        assert!(patch.is_empty());
        assert_eq!(patch.applied_to(title(Some("a"), None)), title(Some("a"), None));
    }

    #[test]
    fn borrowed_view_resolves_columns() {
        let tr = Some("Kedi".to_string());
        let en = None;
        assert_eq!(Translated::of(&tr, &en).resolve(Language::En), Some("Kedi"));
        assert!(!Translated::of(&tr, &en).is_blank());
        assert!(Translated::of(&None, &Some(" ".into())).is_blank());
    }
}
