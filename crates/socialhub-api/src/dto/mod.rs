//! Request and response bodies owned by the HTTP layer.

pub mod request;
pub mod response;

use validator::Validate;

use socialhub_core::error::AppError;

/// Run `validator` rules on a request body.
pub fn validated<T: Validate>(body: T) -> Result<T, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(body)
}
