use std::borrow::Cow;
use validator::{Validate, ValidateEmail, ValidationError};

pub fn validate<T: Validate>(val: &T) -> Result<(), validator::ValidationErrors> {
    val.validate()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(v))
}

/// Rejects empty and whitespace-only text.
pub fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(new_validation_error("required", message));
    }
    Ok(())
}

/// A blank email counts as not given; anything else must be well-formed.
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) || value.trim().validate_email() {
        return Ok(());
    }
    Err(new_validation_error("email", "Email is not valid"))
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
