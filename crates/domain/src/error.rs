//! Domain error types.

use thiserror::Error;

/// Errors raised while decoding ledger data or computing owed fees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A ledger row carried an event type outside `mint`, `burn`, `collect`.
    #[error("unknown liquidity event type `{0}`")]
    UnknownEventType(String),
    /// A numeric field could not be parsed.
    #[error("malformed amount in `{field}`: `{value}`")]
    MalformedAmount {
        /// Name of the offending field.
        field: &'static str,
        /// Raw value as read from the store.
        value: String,
    },
    /// A token amount does not fit the fixed-point decimal range.
    #[error("amount {0} overflows the decimal range")]
    Overflow(String),
    /// A running ledger total left the fixed-point decimal range.
    #[error("`{field}` total overflows the decimal range")]
    TotalOverflow {
        /// Name of the overflowing total.
        field: &'static str,
    },
    /// The position's tick range is inverted.
    #[error("invalid tick range [{lower}, {upper}]")]
    InvalidTickRange {
        /// Lower tick.
        lower: i32,
        /// Upper tick.
        upper: i32,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::MalformedAmount`].
    pub fn malformed(field: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedAmount {
            field,
            value: value.into(),
        }
    }
}
