//! Token Ledger
//!
//! Capped, pausable, mintable and burnable fungible token bookkeeping.
//!
//! # Architecture
//!
//! - **Explicit principals**: every write names the caller it runs for
//! - **Validate then apply**: calls are planned against current state and
//!   committed in one step, so a rejected call changes nothing
//! - **Single Writer**: one actor task owns the token and serializes calls
//! - **Audit journal**: committed calls are hash-chained for replay
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == total supply after every call
//! - Minting is finished forever once finished
//! - Allowances change only through approval calls and spending
//! - Deterministic replay: same journal → same state

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod access;
pub mod actor;
pub mod burn;
pub mod config;
pub mod crypto;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod metrics;
pub mod mint;
pub mod snapshot;
pub mod token;
pub mod transfer;
pub mod types;

// Re-exports
pub use actor::{spawn_token_actor, TokenHandle};
pub use config::Config;
pub use error::{Error, Result};
pub use journal::{Journal, JournalEntry};
pub use metrics::Metrics;
pub use snapshot::Snapshot;
pub use token::Token;
pub use types::{Address, Amount, Event, Operation, TokenMetadata};
