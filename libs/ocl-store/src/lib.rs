//! Dictionary manager store
//!
//! Workflows talk to a [`TerminologyApi`](ocldm_client::TerminologyApi) and
//! report progress as an ordered stream of [`Action`]s. The [`Store`] reduces
//! those actions into [`State`] and broadcasts them to subscribers.
//!
//! ```rust,no_run
//! use ocldm_client::OclClient;
//! use ocldm_store::{bulk_concepts, BulkAddRequest, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OclClient::new()?;
//! let store = Store::new();
//! let request = BulkAddRequest::new(
//!     "/users/me/collections/my-dict/references/",
//!     vec!["/orgs/CIEL/sources/CIEL/concepts/1066/".into()],
//!     vec!["1066".into()],
//! );
//! bulk_concepts::add_existing_bulk_concepts(&client, &store, &request).await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod error;
pub mod state;
pub mod store;
pub mod workflows;

pub use actions::{Action, Fetched, NotificationId, Severity, Toast, TOAST_DURATION};
pub use error::{Error, Result};
pub use state::{reduce, ConceptsState, LoadingState, NotificationState, State, ToastState};
pub use store::{Dispatch, Store};
pub use workflows::bulk_concepts::{self, BulkAddOutcome, BulkAddRequest};
pub use workflows::dictionary_concepts;
pub use workflows::specific_concept;
pub use workflows::{request_error_toast, REQUEST_FAILED_MESSAGE};
