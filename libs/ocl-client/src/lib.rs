//! OCL terminology service client
//!
//! Async REST client for OCL-style terminology services: concept search,
//! source listing, concept lookup, and collection reference management.
//!
//! # Example
//!
//! ```rust,no_run
//! use ocldm_client::{ConceptQuery, OclClient, TerminologyApi};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OclClient::new()?;
//! let concepts = client
//!     .search_concepts(&ConceptQuery::new("malaria", 10, 1))
//!     .await?;
//! println!("{} concepts", concepts.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use api::TerminologyApi;
pub use client::{ClientOptions, OclClient};
pub use error::{Error, ErrorMessage, Result};
pub use models::{references_path, ConceptOwner, ConceptQuery, DEFAULT_PAGE_SIZE};
