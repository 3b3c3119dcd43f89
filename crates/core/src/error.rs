//! Domain errors.
//!
//! The server never rejects a story request, so these only surface on the
//! client: [`CoreError::Validation`] is the idea precondition checked before
//! a request is sent.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
