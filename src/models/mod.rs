pub mod activity;
pub mod dates;
pub mod email;
pub mod link;
pub mod participant;
pub mod trip;

pub(crate) fn normalize_optional(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String, crate::error::AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::AppError::validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional("  Ana "), Some("Ana".to_string()));
        assert_eq!(normalize_optional("   "), None);
        assert_eq!(normalize_optional(""), None);
    }
}
