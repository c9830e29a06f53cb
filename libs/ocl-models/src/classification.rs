//! Concept classification helper
//!
//! Closed enumerations offered by the concept form dropdowns, plus the
//! internal default mapping source.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the source whose concepts are resolved through search instead of
/// being typed in as free text.
pub const INTERNAL_MAPPING_DEFAULT_SOURCE: &str = "CIEL";

/// Canonical URL of the internal default mapping source.
pub const CIEL_SOURCE_URL: &str = "/orgs/CIEL/sources/CIEL/";

/// Declares a closed enumeration with a fixed wire spelling per variant.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in dropdown order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire spelling used by the terminology service.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(Error::UnknownMember {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

closed_enum! {
    /// Clinical category of a concept.
    ConceptClass, "concept class" {
        Drug => "Drug",
        Diagnosis => "Diagnosis",
        Finding => "Finding",
        Anatomy => "Anatomy",
        Question => "Question",
        LabSet => "LabSet",
        MedSet => "MedSet",
        ConvSet => "ConvSet",
        Misc => "Misc",
        Symptom => "Symptom",
        SymptomFinding => "Symptom-Finding",
        Specimen => "Specimen",
        MiscOrder => "Misc-Order",
        Workflow => "Workflow",
        State => "State",
        Program => "Program",
        AggregateMeasurement => "Aggregate-Measurement",
        Indicator => "Indicator",
        HealthCareMonitoringTopics => "Health-Care-Monitoring-Topics",
        RadiologyImagingProcedure => "Radiology-Imaging-Procedure",
        Frequency => "Frequency",
        PharmacologicDrugClass => "Pharmacologic-Drug-Class",
        UnitsOfMeasure => "Units-of-Measure",
        Organism => "Organism",
        DrugForm => "Drug-form",
        MedicalSupply => "Medical-supply",
        InteractSet => "InteractSet",
        Test => "Test",
        Procedure => "Procedure",
    }
}

closed_enum! {
    /// Data type of a concept's observations.
    DataType, "data type" {
        Boolean => "Boolean",
        Coded => "Coded",
        Complex => "Complex",
        Document => "Document",
        Date => "Date",
        Time => "Time",
        Datetime => "Datetime",
        StructuredNumeric => "Structured-Numeric",
        Rule => "Rule",
        Numeric => "Numeric",
        NotApplicable => "N/A",
        Text => "Text",
    }
}

/// Whether `source` names the internal default mapping source.
pub fn is_internal_source(source: &str) -> bool {
    source == INTERNAL_MAPPING_DEFAULT_SOURCE
}
