// ABOUTME: Input validation for todo request bodies and parameters
// ABOUTME: Size limits, required-field checks, and numeric query parsing

use crate::error::ApiError;

/// Maximum title length (in characters)
pub const MAX_TITLE_SIZE: usize = 255;

/// Maximum description length (in characters)
pub const MAX_DESCRIPTION_SIZE: usize = 10_000;

/// Maximum number of rows a single bulk insert may create
pub const MAX_BULK_COUNT: i64 = 10_000;

/// Validate a required title, returning it trimmed
pub fn validate_title(title: &str) -> Result<String, ApiError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }

    check_text("Title", trimmed, MAX_TITLE_SIZE)?;
    Ok(trimmed.to_string())
}

/// Validate an optional title on update. Empty means "keep the current title".
pub fn validate_title_update(title: Option<&str>) -> Result<Option<String>, ApiError> {
    match title.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => validate_title(t).map(Some),
    }
}

pub fn validate_description(description: &str) -> Result<String, ApiError> {
    check_text("Description", description, MAX_DESCRIPTION_SIZE)?;
    Ok(description.to_string())
}

pub fn validate_bulk_count(count: i64) -> Result<usize, ApiError> {
    if !(1..=MAX_BULK_COUNT).contains(&count) {
        return Err(ApiError::validation(format!(
            "countBulk must be between 1 and {} (got {})",
            MAX_BULK_COUNT, count
        )));
    }
    Ok(count as usize)
}

/// Title search needles share the title size limit
pub fn check_search_term(term: &str) -> Result<(), ApiError> {
    check_text("Search title", term, MAX_TITLE_SIZE)
}

/// Parse a todo id path segment
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId(raw.to_string())),
    }
}

/// Lenient numeric query parameter: missing or non-numeric values are treated as unset
pub fn parse_query_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

fn check_text(field: &str, value: &str, max_chars: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len > max_chars {
        return Err(ApiError::validation(format!(
            "{} exceeds maximum size of {} characters (got {} characters)",
            field, max_chars, len
        )));
    }

    // Check for null bytes which could cause issues
    if value.contains('\0') {
        return Err(ApiError::validation(format!(
            "{} contains invalid null bytes",
            field
        )));
    }

    Ok(())
}
