//! Input validation helpers
//!
//! DTO-level limits live in `validator` derives on the request types.
//! These helpers cover fields that arrive through non-derived payloads.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! at the service boundary.

use crate::utils::AppError;

/// Notes and free-text annotations (order item note)
pub const MAX_NOTE_LEN: usize = 500;

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("sem cebola".into()), "note", MAX_NOTE_LEN).is_ok());
        assert!(
            validate_optional_text(&Some("x".repeat(MAX_NOTE_LEN + 1)), "note", MAX_NOTE_LEN)
                .is_err()
        );
    }
}
