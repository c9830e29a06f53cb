//! Form validation errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Every problem found in the form, in field order.
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl FormError {
    pub fn issues(&self) -> &[String] {
        match self {
            FormError::Invalid(issues) => issues,
        }
    }
}
