//! OCL dictionary models
//!
//! Strongly-typed structures for the documents exchanged with an OCL-style
//! terminology service, and the closed enumerations the concept forms offer.
//!
//! # Example
//!
//! ```rust
//! use ocldm_models::{Concept, ConceptClass};
//! use serde_json::json;
//!
//! let concept = Concept::from_value(json!({
//!     "url": "/orgs/CIEL/sources/CIEL/concepts/1066/",
//!     "concept_class": "Misc",
//!     "datatype": "N/A"
//! }))
//! .unwrap();
//! assert_eq!(concept.concept_class(), Some(ConceptClass::Misc));
//! ```

pub mod classification;
pub mod concept;
pub mod error;
pub mod locale;
pub mod map_type;

pub use classification::{
    is_internal_source, ConceptClass, DataType, CIEL_SOURCE_URL, INTERNAL_MAPPING_DEFAULT_SOURCE,
};
pub use concept::*;
pub use error::{Error, Result};
pub use locale::{find_locale, locale_or_default, LocaleOption, DEFAULT_LOCALE, LOCALES};
pub use map_type::{is_dependent_map_type, map_types_for, DEPENDENT_MAP_TYPES};
