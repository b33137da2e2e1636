//! Core types for the token ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode) so journal hashes are stable
//! - Exact arithmetic (256-bit unsigned amounts, never wrapping)

use crate::config::MAX_DECIMALS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token amount (256-bit unsigned)
pub use primitive_types::U256 as Amount;

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Reserved null address; never a valid destination or owner
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create from raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address holding `n` in its low 8 bytes. Handy for fixtures.
    pub const fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        let be = n.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Get bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True for the null sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Token metadata, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Display decimals
    pub decimals: u8,
}

impl TokenMetadata {
    /// Check name, symbol and decimals
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("Token name must not be empty".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(Error::Config("Token symbol must not be empty".to_string()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "Decimals {} exceeds maximum {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        Ok(())
    }
}

/// Observation record emitted by a committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Supply created for `to`
    Mint {
        /// Credited account
        to: Address,
        /// Minted amount
        amount: Amount,
    },
    /// Value moved; `from` is the null address for mints
    Transfer {
        /// Debited account
        from: Address,
        /// Credited account
        to: Address,
        /// Moved amount
        value: Amount,
    },
    /// Supply destroyed from `from`
    Burn {
        /// Debited account
        from: Address,
        /// Burned amount
        amount: Amount,
    },
    /// Allowance set to `value`
    Approval {
        /// Account whose balance may be spent
        owner: Address,
        /// Account allowed to spend
        spender: Address,
        /// New allowance
        value: Amount,
    },
}

impl Event {
    /// Record name as it appears in the external log
    pub fn name(&self) -> &'static str {
        match self {
            Event::Mint { .. } => "Mint",
            Event::Transfer { .. } => "Transfer",
            Event::Burn { .. } => "Burn",
            Event::Approval { .. } => "Approval",
        }
    }
}

/// A ledger call, minus its caller
///
/// Used by the actor mailbox and the audit journal, which both need calls as
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Grant or revoke mint rights
    SetMintAgent {
        /// Agent address
        agent: Address,
        /// Grant (true) or revoke (false)
        enabled: bool,
    },
    /// Hand the owner role to another address
    TransferOwnership {
        /// New owner
        new_owner: Address,
    },
    /// Pause value movement
    Stop,
    /// Resume value movement
    Start,
    /// Create supply
    Mint {
        /// Credited account
        to: Address,
        /// Amount
        amount: Amount,
    },
    /// Permanently disable minting
    FinishMinting,
    /// Move caller's balance
    Transfer {
        /// Credited account
        to: Address,
        /// Amount
        amount: Amount,
    },
    /// Overwrite an allowance
    Approve {
        /// Spender
        spender: Address,
        /// New allowance
        amount: Amount,
    },
    /// Raise an allowance
    IncreaseAllowance {
        /// Spender
        spender: Address,
        /// Added amount
        added: Amount,
    },
    /// Lower an allowance, saturating at zero
    DecreaseAllowance {
        /// Spender
        spender: Address,
        /// Subtracted amount
        subtracted: Amount,
    },
    /// Spend an allowance to move someone else's balance
    TransferFrom {
        /// Debited account
        from: Address,
        /// Credited account
        to: Address,
        /// Amount
        amount: Amount,
    },
    /// Destroy caller's balance
    Burn {
        /// Amount
        amount: Amount,
    },
    /// Spend an allowance to destroy someone else's balance
    BurnFrom {
        /// Debited account
        from: Address,
        /// Amount
        amount: Amount,
    },
}

impl Operation {
    /// Operation name for logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SetMintAgent { .. } => "set_mint_agent",
            Operation::TransferOwnership { .. } => "transfer_ownership",
            Operation::Stop => "stop",
            Operation::Start => "start",
            Operation::Mint { .. } => "mint",
            Operation::FinishMinting => "finish_minting",
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
            Operation::IncreaseAllowance { .. } => "increase_allowance",
            Operation::DecreaseAllowance { .. } => "decrease_allowance",
            Operation::TransferFrom { .. } => "transfer_from",
            Operation::Burn { .. } => "burn",
            Operation::BurnFrom { .. } => "burn_from",
        }
    }
}
