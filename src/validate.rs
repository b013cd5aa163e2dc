//! Input validation shared by the handlers.

use crate::error::ApiError;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 50;

pub fn item_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        return Err(ApiError::Validation(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters, got {len}"
        )));
    }
    Ok(())
}

pub fn item_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ApiError::Validation(
            "price must be a finite number greater than 0".to_owned(),
        ));
    }
    Ok(())
}

pub fn username(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        return Err(ApiError::Validation(format!(
            "username must be between {NAME_MIN} and {NAME_MAX} characters, got {len}"
        )));
    }
    Ok(())
}

/// Reject-then-normalize sanitization for free-text bio fields: no line
/// breaks, no script tags, surrounding whitespace trimmed.
pub fn bio(bio: &str) -> Result<String, ApiError> {
    if bio.contains('\n') || bio.contains('\r') {
        return Err(ApiError::Validation(
            "line breaks are not allowed in bio".to_owned(),
        ));
    }
    if bio.to_lowercase().contains("<script>") {
        return Err(ApiError::Validation(
            "disallowed script pattern in bio".to_owned(),
        ));
    }
    Ok(bio.trim().to_owned())
}
