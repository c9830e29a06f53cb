//! Locales offered by the description and name dropdowns

use serde::Serialize;

/// Locale used when the page language is not in the list.
pub const DEFAULT_LOCALE: &str = "en";

/// A selectable locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const LOCALES: &[LocaleOption] = &[
    LocaleOption { value: "en", label: "English [en]" },
    LocaleOption { value: "fr", label: "French [fr]" },
    LocaleOption { value: "es", label: "Spanish [es]" },
    LocaleOption { value: "pt", label: "Portuguese [pt]" },
    LocaleOption { value: "de", label: "German [de]" },
    LocaleOption { value: "it", label: "Italian [it]" },
    LocaleOption { value: "nl", label: "Dutch [nl]" },
    LocaleOption { value: "ru", label: "Russian [ru]" },
    LocaleOption { value: "ar", label: "Arabic [ar]" },
    LocaleOption { value: "zh", label: "Chinese [zh]" },
    LocaleOption { value: "hi", label: "Hindi [hi]" },
    LocaleOption { value: "sw", label: "Swahili [sw]" },
    LocaleOption { value: "rw", label: "Kinyarwanda [rw]" },
    LocaleOption { value: "ht", label: "Haitian [ht]" },
    LocaleOption { value: "vi", label: "Vietnamese [vi]" },
    LocaleOption { value: "km", label: "Khmer [km]" },
    LocaleOption { value: "ne", label: "Nepali [ne]" },
    LocaleOption { value: "am", label: "Amharic [am]" },
    LocaleOption { value: "id", label: "Indonesian [id]" },
];

pub fn find_locale(value: &str) -> Option<&'static LocaleOption> {
    LOCALES.iter().find(|l| l.value == value)
}

/// Locale for `value`, falling back to [`DEFAULT_LOCALE`].
pub fn locale_or_default(value: Option<&str>) -> &'static LocaleOption {
    value
        .and_then(find_locale)
        .or_else(|| find_locale(DEFAULT_LOCALE))
        .unwrap_or(&LOCALES[0])
}
