//! Description row
//!
//! Every local change produces a full snapshot of the row for the form; the
//! form never receives diffs.

use ocldm_models::{locale_or_default, new_row_id, LocaleOption, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};

/// Canonical data of one description row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRowData {
    pub uuid: String,
    pub locale: String,
    pub description: String,
}

impl Default for DescriptionRowData {
    fn default() -> Self {
        Self {
            uuid: new_row_id(),
            locale: DEFAULT_LOCALE.to_string(),
            description: String::new(),
        }
    }
}

/// Row collections of a concept form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Names,
    Descriptions,
    Mappings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionEvent {
    TextChanged(String),
    LocaleSelected(String),
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionMessage {
    /// Full current state of the row.
    Snapshot(DescriptionRowData),
    /// Row removal, addressed with the row as it was handed to us.
    RemoveRow(DescriptionRowData),
    /// Drop the row's data from the form.
    RemoveData { id: String, kind: RowKind },
}

#[derive(Debug, Clone)]
pub struct DescriptionRow {
    original: DescriptionRowData,
    state: DescriptionRowData,
}

impl DescriptionRow {
    /// New row. The locale starts from the page language; the row id from
    /// `new_row` when one is supplied.
    pub fn new(page_language: &str, new_row: Option<DescriptionRowData>) -> Self {
        let original = new_row.unwrap_or_default();
        let state = DescriptionRowData {
            uuid: original.uuid.clone(),
            locale: locale_or_default(Some(page_language)).value.to_string(),
            description: String::new(),
        };
        Self { original, state }
    }

    /// Hydrate from the supplied row when editing an existing concept.
    pub fn mount(&mut self, existing_concept: bool) -> Option<DescriptionMessage> {
        if !existing_concept {
            return None;
        }
        let locale = if self.original.locale.is_empty() {
            DEFAULT_LOCALE.to_string()
        } else {
            self.original.locale.clone()
        };
        self.state = DescriptionRowData {
            uuid: self.original.uuid.clone(),
            locale,
            description: self.original.description.clone(),
        };
        Some(self.snapshot())
    }

    pub fn handle(&mut self, event: DescriptionEvent) -> Vec<DescriptionMessage> {
        match event {
            DescriptionEvent::TextChanged(text) => {
                self.state.description = text;
                vec![self.snapshot()]
            }
            DescriptionEvent::LocaleSelected(locale) => {
                self.state.locale = locale;
                vec![self.snapshot()]
            }
            DescriptionEvent::Remove => vec![
                DescriptionMessage::RemoveRow(self.original.clone()),
                DescriptionMessage::RemoveData {
                    id: self.original.uuid.clone(),
                    kind: RowKind::Descriptions,
                },
            ],
        }
    }

    pub fn state(&self) -> &DescriptionRowData {
        &self.state
    }

    /// Dropdown entry for the current locale.
    pub fn locale_option(&self) -> &'static LocaleOption {
        locale_or_default(Some(&self.state.locale))
    }

    fn snapshot(&self) -> DescriptionMessage {
        DescriptionMessage::Snapshot(self.state.clone())
    }
}
