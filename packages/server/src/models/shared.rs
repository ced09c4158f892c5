use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Plain acknowledgement body.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Student removed from class")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Fail with one message naming every blank field.
///
/// `fields` pairs a field name with its submitted value; whitespace-only
/// counts as blank.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Please add all required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Validate a non-blank field on update. Blank values for required fields
/// are rejected rather than stored.
pub fn validate_present(name: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::Validation(format!("{name} must not be empty")))
        }
        _ => Ok(()),
    }
}

/// Money amounts must be finite and non-negative. Zero is valid.
pub fn validate_amount(name: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{name} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Accept only absolute `http://` or `https://` links with a host.
pub fn validate_http_url(name: &str, value: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation(format!("{name} must be an http(s) URL"));
    let value = value.trim();
    let parsed = url::Url::parse(value).map_err(|_| invalid())?;
    // The parser skips extra slashes, so `https:///x` would yield host `x`.
    let has_authority = value
        .get(parsed.scheme().len()..)
        .and_then(|rest| rest.strip_prefix("://"))
        .is_some_and(|rest| !rest.starts_with(['/', '\\']));
    let has_host = has_authority && parsed.host_str().is_some_and(|host| !host.is_empty());
    if matches!(parsed.scheme(), "http" | "https") && has_host {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Trim a required text value for storage.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional text value; blank becomes `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
