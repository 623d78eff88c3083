//! Error types for sqlfold

use thiserror::Error;

/// Result type alias for sqlfold operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while assembling a statement.
///
/// Every error is reported by the call that triggers it; builders never retry
/// or swallow them.
#[derive(Debug, Error)]
pub enum QbError {
    /// A page, page size, offset, take or TOP count outside its valid range
    #[error("{name} out of range ({value}): {message}")]
    Range {
        name: &'static str,
        value: i64,
        message: String,
    },

    /// A column was referenced before its owning table was registered
    #[error("Alias not found for entity type: {entity}")]
    AliasNotFound { entity: String },

    /// Operator outside the supported comparison/logical set
    #[error("Unsupported binary operator: {0}")]
    UnsupportedOperator(String),

    /// Expression shape the compiler does not lower
    #[error("Unsupported expression type: {0}")]
    UnsupportedExpression(String),

    /// ORDER BY target that is not a plain column reference
    #[error("Unsupported expression type for ORDER BY: {0}")]
    UnsupportedOrderExpression(String),

    /// Builder could not be created from its inputs
    #[error("Construction error: {0}")]
    Construction(String),

    /// Malformed identifier or parameter name
    #[error("Validation error: {0}")]
    Validation(String),

    /// Statement binds more parameters than the configured limit
    #[error("Too many parameters: {count} exceeds the limit of {limit}")]
    TooManyParameters { count: usize, limit: usize },
}

impl QbError {
    /// Create a range error for the named argument
    pub fn range(name: &'static str, value: i64, message: impl Into<String>) -> Self {
        Self::Range {
            name,
            value,
            message: message.into(),
        }
    }

    /// Create an alias lookup error for the named entity type
    pub fn alias_not_found(entity: impl Into<String>) -> Self {
        Self::AliasNotFound {
            entity: entity.into(),
        }
    }

    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a range error
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Check if this is an alias lookup error
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::AliasNotFound { .. })
    }

    /// Check if this is an unsupported operator/expression/order error
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperator(_)
                | Self::UnsupportedExpression(_)
                | Self::UnsupportedOrderExpression(_)
        )
    }

    /// Check if this is a construction error
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_not_found_names_entity() {
        let err = QbError::alias_not_found("Role");
        assert!(err.is_lookup());
        assert_eq!(err.to_string(), "Alias not found for entity type: Role");
    }

    #[test]
    fn test_range_message() {
        let err = QbError::range("page", 0, "page must be >= 1");
        assert!(err.is_range());
        assert_eq!(err.to_string(), "page out of range (0): page must be >= 1");
    }
}
