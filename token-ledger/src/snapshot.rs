//! Point-in-time image of a token
//!
//! Collections are sorted so two snapshots of equal state are byte-identical.
//! Files are bincode; restoring goes through [`crate::Token::from_snapshot`],
//! which re-checks supply conservation before accepting the image.

use crate::types::{Address, Amount, TokenMetadata};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Token metadata
    pub metadata: TokenMetadata,

    /// Owner
    pub owner: Address,

    /// Registered mint agents, sorted
    pub mint_agents: Vec<Address>,

    /// Pause flag
    pub paused: bool,

    /// Minting lock
    pub minting_finished: bool,

    /// Supply cap
    pub cap: Option<Amount>,

    /// Total supply
    pub total_supply: Amount,

    /// Non-zero balances, sorted by account
    pub balances: Vec<(Address, Amount)>,

    /// Non-zero allowances, sorted by (owner, spender)
    pub allowances: Vec<((Address, Address), Amount)>,

    /// Sequence the next journal entry will get
    pub journal_next_sequence: u64,

    /// Hash of the last journal entry (zeros if none)
    pub journal_head: [u8; 32],
}

impl Snapshot {
    /// Encode as bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Write to `path`, replacing any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        // Target is replaced atomically via rename
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Snapshot written");
        Ok(())
    }

    /// Read from `path`
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
