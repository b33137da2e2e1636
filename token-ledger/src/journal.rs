//! Hash-chained audit journal
//!
//! Every committed call is appended as a [`JournalEntry`] carrying its caller,
//! the call itself, the records it emitted, and the hash of the previous
//! entry. Rejected calls leave no trace here because they leave no trace in
//! the ledger either.
//!
//! # Invariants
//!
//! - Sequence numbers are contiguous
//! - `entry.prev_hash == previous.hash`, the first entry chaining to the
//!   journal's base hash (zeros at genesis, the snapshot head after restore)
//! - `entry.hash == SHA-256(bincode(sequence, caller, operation, events, prev_hash))`

use crate::crypto::{hash_bytes, merkle_root};
use crate::types::{Address, Event, Operation};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One committed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal
    pub sequence: u64,
    /// Principal that made the call
    pub caller: Address,
    /// The call
    pub operation: Operation,
    /// Records the call emitted, in order
    pub events: Vec<Event>,
    /// Hash of the previous entry
    pub prev_hash: [u8; 32],
    /// Hash of this entry
    pub hash: [u8; 32],
}

impl JournalEntry {
    /// Canonical bytes of everything except `hash` itself
    ///
    /// Every field is fixed-shape data, so bincode encoding cannot fail.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serialize(&(
            self.sequence,
            &self.caller,
            &self.operation,
            &self.events,
            &self.prev_hash,
        ))
        .expect("serialization cannot fail")
    }

    /// Hash over the canonical bytes
    pub fn compute_hash(&self) -> [u8; 32] {
        hash_bytes(&self.canonical_bytes())
    }
}

/// Append-only log of committed calls
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    base_sequence: u64,
    base_hash: [u8; 32],
}

impl Journal {
    /// Empty journal at genesis
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty journal continuing after `next_sequence - 1`, chained to `head_hash`
    pub fn resume(next_sequence: u64, head_hash: [u8; 32]) -> Self {
        Self {
            entries: Vec::new(),
            base_sequence: next_sequence,
            base_hash: head_hash,
        }
    }

    /// Append a committed call and return the sealed entry
    pub fn append(&mut self, caller: Address, operation: Operation, events: Vec<Event>) -> &JournalEntry {
        let mut entry = JournalEntry {
            sequence: self.next_sequence(),
            caller,
            operation,
            events,
            prev_hash: self.head_hash(),
            hash: [0u8; 32],
        };
        entry.hash = entry.compute_hash();

        self.entries.push(entry);
        let index = self.entries.len() - 1;
        &self.entries[index]
    }

    /// Entries held by this journal
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number the next entry will get
    pub fn next_sequence(&self) -> u64 {
        self.base_sequence + self.entries.len() as u64
    }

    /// Hash of the latest entry (base hash when empty)
    pub fn head_hash(&self) -> [u8; 32] {
        self.entries.last().map(|e| e.hash).unwrap_or(self.base_hash)
    }

    /// Merkle root over all entry hashes
    pub fn merkle_root(&self) -> [u8; 32] {
        let hashes: Vec<[u8; 32]> = self.entries.iter().map(|e| e.hash).collect();
        merkle_root(&hashes)
    }

    /// Recompute every hash and link
    pub fn verify(&self) -> Result<()> {
        verify_chain(&self.entries, self.base_sequence, self.base_hash)
    }
}

/// Verify a run of entries starting at `first_sequence` and chained to `base_hash`
pub fn verify_chain(entries: &[JournalEntry], first_sequence: u64, base_hash: [u8; 32]) -> Result<()> {
    let mut prev_hash = base_hash;

    for (offset, entry) in entries.iter().enumerate() {
        let expected_sequence = first_sequence + offset as u64;
        if entry.sequence != expected_sequence {
            return Err(Error::InvariantViolation(format!(
                "journal sequence {} found where {} expected",
                entry.sequence, expected_sequence
            )));
        }
        if entry.prev_hash != prev_hash {
            return Err(Error::InvariantViolation(format!(
                "journal entry {} does not chain to its predecessor",
                entry.sequence
            )));
        }
        if entry.compute_hash() != entry.hash {
            return Err(Error::InvariantViolation(format!(
                "journal entry {} hash mismatch",
                entry.sequence
            )));
        }
        prev_hash = entry.hash;
    }

    Ok(())
}
