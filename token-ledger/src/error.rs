//! Error types for the token ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// The first group are rule violations raised by the ledger itself. Every one
/// of them is returned before any state is touched, so a rejected call leaves
/// the ledger exactly as it was.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Caller lacks the role the operation requires
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    /// Null address used where a real account is required
    #[error("Invalid address: the null address is not allowed here")]
    InvalidAddress,

    /// Account balance below the requested amount
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Spender allowance below the requested amount
    #[error("Insufficient allowance")]
    InsufficientAllowance,

    /// Minting has been permanently finished
    #[error("Minting is finished")]
    MintingFinished,

    /// Value movement is stopped
    #[error("Ledger is paused")]
    Paused,

    /// Arithmetic would exceed the amount range
    #[error("Arithmetic overflow")]
    Overflow,

    /// Amount not acceptable for the operation (zero mint)
    #[error("Invalid amount: must be positive")]
    InvalidAmount,

    /// Mint would push total supply past the configured cap
    #[error("Supply cap exceeded")]
    CapExceeded,

    /// Invariant violation (supply conservation, replay divergence, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Unauthorized => "unauthorized",
            Error::InvalidAddress => "invalid_address",
            Error::InsufficientBalance => "insufficient_balance",
            Error::InsufficientAllowance => "insufficient_allowance",
            Error::MintingFinished => "minting_finished",
            Error::Paused => "paused",
            Error::Overflow => "overflow",
            Error::InvalidAmount => "invalid_amount",
            Error::CapExceeded => "cap_exceeded",
            Error::InvariantViolation(_) => "invariant_violation",
            Error::Config(_) => "config",
            Error::Concurrency(_) => "concurrency",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }

    /// True for rejections caused by the ledger rules rather than the environment
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized
                | Error::InvalidAddress
                | Error::InsufficientBalance
                | Error::InsufficientAllowance
                | Error::MintingFinished
                | Error::Paused
                | Error::Overflow
                | Error::InvalidAmount
                | Error::CapExceeded
        )
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(Error::Paused.kind(), "paused");
        assert_eq!(Error::InvariantViolation("x".into()).kind(), "invariant_violation");
    }

    #[test]
    fn test_rule_violation_split() {
        assert!(Error::InsufficientAllowance.is_rule_violation());
        assert!(Error::CapExceeded.is_rule_violation());
        assert!(!Error::Concurrency("closed".into()).is_rule_violation());
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("gone"));
    }
}
