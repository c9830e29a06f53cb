//! Map types offered by the mapping row

use crate::classification::is_internal_source;

/// Map types whose target concept must travel with the concept into a
/// dictionary (answers of a question, members of a set).
pub const DEPENDENT_MAP_TYPES: &[&str] = &["Q-AND-A", "CONCEPT-SET"];

/// Map types for relations to external reference terminologies.
pub const EXTERNAL_MAP_TYPES: &[&str] = &["SAME-AS", "NARROWER-THAN", "BROADER-THAN"];

/// Map types offered for `source`: internal concepts may also be answers or
/// set members.
pub fn map_types_for(source: &str) -> Vec<&'static str> {
    let mut types = EXTERNAL_MAP_TYPES.to_vec();
    if is_internal_source(source) {
        types.extend_from_slice(DEPENDENT_MAP_TYPES);
    }
    types
}

pub fn is_dependent_map_type(map_type: &str) -> bool {
    DEPENDENT_MAP_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(map_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_source_offers_dependent_types() {
        assert!(map_types_for("CIEL").contains(&"Q-AND-A"));
        assert!(!map_types_for("ICD-10").contains(&"CONCEPT-SET"));
        assert!(map_types_for("ICD-10").contains(&"SAME-AS"));
    }

    #[test]
    fn dependent_map_type_is_case_insensitive() {
        assert!(is_dependent_map_type("q-and-a"));
        assert!(!is_dependent_map_type("SAME-AS"));
    }
}
