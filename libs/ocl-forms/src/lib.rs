//! Concept edit forms
//!
//! Row editors emit typed messages; [`ConceptForm`] owns the canonical row
//! collections and turns them into service documents.
//!
//! ```rust
//! use ocldm_forms::{ConceptForm, DescriptionEvent, DescriptionRow};
//!
//! let mut form = ConceptForm::new("malaria-1");
//! let data = form.add_description_row("en");
//! let mut row = DescriptionRow::new("en", Some(data));
//! for message in row.handle(DescriptionEvent::TextChanged("Malaria".into())) {
//!     form.apply_description(message);
//! }
//! assert_eq!(form.descriptions()[0].description, "Malaria");
//! ```

pub mod description;
pub mod error;
pub mod form;
pub mod mapping;

pub use description::{
    DescriptionEvent, DescriptionMessage, DescriptionRow, DescriptionRowData, RowKind,
};
pub use error::{FormError, Result};
pub use form::{ConceptForm, NameRowData};
pub use mapping::{
    fetch_source_options, ConceptField, MappingEvent, MappingField, MappingMessage, MappingRow,
    MappingRowData, MappingRowLayout, SelectOption,
};
