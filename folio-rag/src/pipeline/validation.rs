use super::state::RawQuery;

/// Why a query was rejected. `Display` gives the user-facing sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Error: Query cannot be empty.")]
    Empty,
    #[error("Error: Query must be a string, got {0}.")]
    NotAString(String),
}

/// Returns the trimmed query, or the reason it cannot be answered.
pub fn validate_query(raw: &RawQuery) -> Result<String, ValidationError> {
    match raw {
        RawQuery::Missing => Err(ValidationError::Empty),
        RawQuery::Other(type_name) => Err(ValidationError::NotAString(type_name.clone())),
        RawQuery::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(ValidationError::Empty)
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}
