use thiserror::Error;

use crate::domain::BookField;

/// Submission-time checks on a draft book.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingField(BookField),
    #[error("published date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
}

impl ValidationError {
    pub fn field(&self) -> BookField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::InvalidDate(_) => BookField::PublishedDate,
        }
    }
}
