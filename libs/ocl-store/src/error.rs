//! Error types for dictionary workflows

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] ocldm_client::Error),

    #[error("Invalid concept form: {0}")]
    Validation(#[from] ocldm_forms::FormError),

    #[error(transparent)]
    Model(#[from] ocldm_models::Error),
}
