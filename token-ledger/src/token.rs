//! Token facade
//!
//! Ties access control, bookkeeping, minting and the audit journal into the
//! full operation surface. Every write takes the calling principal explicitly
//! and returns the observation records it emitted.
//!
//! # Example
//!
//! ```
//! use token_ledger::{Address, Amount, Config, Token};
//!
//! # fn main() -> token_ledger::Result<()> {
//! let owner = Address::from_low_u64(1);
//! let alice = Address::from_low_u64(2);
//!
//! let mut token = Token::new(owner, &Config::default())?;
//! token.mint(&owner, alice, Amount::from(100u64))?;
//! token.transfer(&alice, owner, Amount::from(40u64))?;
//!
//! assert_eq!(token.balance_of(&alice), Amount::from(60u64));
//! assert_eq!(token.total_supply(), Amount::from(100u64));
//! # Ok(())
//! # }
//! ```

use crate::{
    access::AccessControl,
    burn,
    journal::{verify_chain, Journal, JournalEntry},
    ledger::Ledger,
    mint::MintController,
    snapshot::Snapshot,
    transfer,
    types::{Address, Amount, Event, Operation, TokenMetadata},
    Config, Error, Result,
};

/// Fungible token ledger with roles, pause switch and audit journal
#[derive(Debug, Clone)]
pub struct Token {
    metadata: TokenMetadata,
    access: AccessControl,
    ledger: Ledger,
    minting: MintController,
    journal: Option<Journal>,
}

impl Token {
    /// Deploy a new token. `deployer` becomes owner and first mint agent.
    pub fn new(deployer: Address, config: &Config) -> Result<Self> {
        config.validate()?;

        let token = Self {
            metadata: config.token.metadata(),
            access: AccessControl::new(deployer)?,
            ledger: Ledger::new(),
            minting: MintController::new(config.token.cap()?),
            journal: config.journal.enabled.then(Journal::new),
        };

        tracing::info!(
            service = %config.service_name,
            name = %token.metadata.name,
            symbol = %token.metadata.symbol,
            owner = %deployer,
            "Token created"
        );
        Ok(token)
    }

    /// Rebuild a token from the deployer, its config and a genesis journal.
    ///
    /// Every entry is re-executed; a rejected call or any difference in the
    /// emitted records is an invariant violation.
    pub fn replay(
        deployer: Address,
        config: &Config,
        entries: &[JournalEntry],
    ) -> Result<Self> {
        verify_chain(entries, 0, [0u8; 32])?;

        let mut token = Self::new(deployer, config)?;
        for entry in entries {
            let events = token
                .execute(&entry.caller, entry.operation.clone())
                .map_err(|e| {
                    Error::InvariantViolation(format!(
                        "journal entry {} rejected on replay: {}",
                        entry.sequence, e
                    ))
                })?;

            if events != entry.events {
                return Err(Error::InvariantViolation(format!(
                    "journal entry {} emitted different records on replay",
                    entry.sequence
                )));
            }
        }

        tracing::info!(entries = entries.len(), "Token replayed from journal");
        Ok(token)
    }

    /// Restore from a snapshot. Metadata, conservation and a non-null owner are checked.
    pub fn from_snapshot(snapshot: Snapshot, journal_enabled: bool) -> Result<Self> {
        snapshot
            .metadata
            .validate()
            .map_err(|e| Error::InvariantViolation(format!("snapshot metadata: {}", e)))?;

        let ledger = Ledger::from_parts(snapshot.balances, snapshot.allowances, snapshot.total_supply)?;
        let access = AccessControl::from_parts(snapshot.owner, snapshot.mint_agents, snapshot.paused)?;
        let minting = MintController::from_parts(snapshot.minting_finished, snapshot.cap);

        if let Some(cap) = snapshot.cap {
            if ledger.total_supply() > cap {
                return Err(Error::InvariantViolation(format!(
                    "total supply {} exceeds cap {}",
                    ledger.total_supply(),
                    cap
                )));
            }
        }

        let journal = journal_enabled
            .then(|| Journal::resume(snapshot.journal_next_sequence, snapshot.journal_head));

        tracing::info!(
            holders = ledger.holders().len(),
            total_supply = %ledger.total_supply(),
            "Token restored from snapshot"
        );

        Ok(Self {
            metadata: snapshot.metadata,
            access,
            ledger,
            minting,
            journal,
        })
    }

    /// Capture the complete state
    pub fn snapshot(&self) -> Snapshot {
        let (journal_next_sequence, journal_head) = self
            .journal
            .as_ref()
            .map(|j| (j.next_sequence(), j.head_hash()))
            .unwrap_or((0, [0u8; 32]));

        Snapshot {
            metadata: self.metadata.clone(),
            owner: self.access.owner(),
            mint_agents: self.access.mint_agents(),
            paused: self.access.is_paused(),
            minting_finished: self.minting.is_finished(),
            cap: self.minting.cap(),
            total_supply: self.ledger.total_supply(),
            balances: self.ledger.holders(),
            allowances: self.ledger.allowances(),
            journal_next_sequence,
            journal_head,
        }
    }

    // -------- read API --------

    /// Token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Display decimals
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Full metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Supply cap, if any
    pub fn cap(&self) -> Option<Amount> {
        self.minting.cap()
    }

    /// Total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Balance of `account`
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    /// Allowance `owner` granted `spender`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Whether `account` is a registered mint agent
    pub fn is_mint_agent(&self, account: &Address) -> bool {
        self.access.is_mint_agent(account)
    }

    /// Whether minting is permanently disabled
    pub fn minting_finished(&self) -> bool {
        self.minting.is_finished()
    }

    /// Whether value movement is stopped
    pub fn paused(&self) -> bool {
        self.access.is_paused()
    }

    /// Audit journal, when enabled
    pub fn journal(&self) -> Option<&Journal> {
        self.journal.as_ref()
    }

    /// Verify Σ(balances) == total supply
    pub fn check_invariants(&self) -> Result<()> {
        self.ledger.check_conservation()
    }

    // -------- write API --------

    /// Run one call on behalf of `caller`.
    ///
    /// On success the records are journaled and returned; on failure nothing
    /// has changed.
    pub fn execute(&mut self, caller: &Address, operation: Operation) -> Result<Vec<Event>> {
        match self.dispatch(caller, &operation) {
            Ok(events) => {
                debug_assert!(self.ledger.check_conservation().is_ok());
                tracing::debug!(
                    operation = operation.name(),
                    %caller,
                    records = events.len(),
                    "Operation committed"
                );
                if let Some(journal) = self.journal.as_mut() {
                    journal.append(*caller, operation, events.clone());
                }
                Ok(events)
            }
            Err(e) if e.is_rule_violation() => {
                tracing::warn!(
                    operation = operation.name(),
                    %caller,
                    error = %e,
                    "Operation rejected"
                );
                Err(e)
            }
            Err(e) => {
                tracing::error!(
                    operation = operation.name(),
                    %caller,
                    error = %e,
                    "Operation failed"
                );
                Err(e)
            }
        }
    }

    fn dispatch(&mut self, caller: &Address, operation: &Operation) -> Result<Vec<Event>> {
        match *operation {
            Operation::SetMintAgent { agent, enabled } => {
                self.access.set_mint_agent(caller, agent, enabled)?;
                Ok(Vec::new())
            }
            Operation::TransferOwnership { new_owner } => {
                self.access.transfer_ownership(caller, new_owner)?;
                Ok(Vec::new())
            }
            Operation::Stop => {
                self.access.stop(caller)?;
                Ok(Vec::new())
            }
            Operation::Start => {
                self.access.start(caller)?;
                Ok(Vec::new())
            }
            Operation::Mint { to, amount } => {
                self.minting.mint(&self.access, &mut self.ledger, caller, to, amount)
            }
            Operation::FinishMinting => {
                self.minting.finish_minting(&self.access, caller)?;
                Ok(Vec::new())
            }
            Operation::Transfer { to, amount } => {
                transfer::transfer(&self.access, &mut self.ledger, caller, to, amount)
            }
            Operation::Approve { spender, amount } => {
                Ok(transfer::approve(&mut self.ledger, caller, spender, amount))
            }
            Operation::IncreaseAllowance { spender, added } => {
                transfer::increase_allowance(&mut self.ledger, caller, spender, added)
            }
            Operation::DecreaseAllowance { spender, subtracted } => {
                Ok(transfer::decrease_allowance(&mut self.ledger, caller, spender, subtracted))
            }
            Operation::TransferFrom { from, to, amount } => {
                transfer::transfer_from(&self.access, &mut self.ledger, caller, from, to, amount)
            }
            Operation::Burn { amount } => burn::burn(&self.access, &mut self.ledger, caller, amount),
            Operation::BurnFrom { from, amount } => {
                burn::burn_from(&self.access, &mut self.ledger, caller, from, amount)
            }
        }
    }

    /// Grant or revoke mint rights (owner only)
    pub fn set_mint_agent(&mut self, caller: &Address, agent: Address, enabled: bool) -> Result<()> {
        self.execute(caller, Operation::SetMintAgent { agent, enabled }).map(drop)
    }

    /// Hand the owner role to `new_owner` (owner only)
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.execute(caller, Operation::TransferOwnership { new_owner }).map(drop)
    }

    /// Pause value movement (owner only)
    pub fn stop(&mut self, caller: &Address) -> Result<()> {
        self.execute(caller, Operation::Stop).map(drop)
    }

    /// Resume value movement (owner only)
    pub fn start(&mut self, caller: &Address) -> Result<()> {
        self.execute(caller, Operation::Start).map(drop)
    }

    /// Create supply for `to` (mint agents only)
    pub fn mint(&mut self, caller: &Address, to: Address, amount: Amount) -> Result<Vec<Event>> {
        self.execute(caller, Operation::Mint { to, amount })
    }

    /// Permanently disable minting (owner only)
    pub fn finish_minting(&mut self, caller: &Address) -> Result<()> {
        self.execute(caller, Operation::FinishMinting).map(drop)
    }

    /// Move `amount` of the caller's balance to `to`
    pub fn transfer(&mut self, caller: &Address, to: Address, amount: Amount) -> Result<Vec<Event>> {
        self.execute(caller, Operation::Transfer { to, amount })
    }

    /// Set the allowance the caller grants `spender`
    pub fn approve(&mut self, caller: &Address, spender: Address, amount: Amount) -> Result<Vec<Event>> {
        self.execute(caller, Operation::Approve { spender, amount })
    }

    /// Raise the allowance the caller grants `spender`
    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: Address,
        added: Amount,
    ) -> Result<Vec<Event>> {
        self.execute(caller, Operation::IncreaseAllowance { spender, added })
    }

    /// Lower the allowance the caller grants `spender`, stopping at zero
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<Vec<Event>> {
        self.execute(caller, Operation::DecreaseAllowance { spender, subtracted })
    }

    /// Move `amount` from `from` to `to` using the caller's allowance
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<Event>> {
        self.execute(caller, Operation::TransferFrom { from, to, amount })
    }

    /// Destroy `amount` of the caller's balance
    pub fn burn(&mut self, caller: &Address, amount: Amount) -> Result<Vec<Event>> {
        self.execute(caller, Operation::Burn { amount })
    }

    /// Destroy `amount` of `from`'s balance using the caller's allowance
    pub fn burn_from(&mut self, caller: &Address, from: Address, amount: Amount) -> Result<Vec<Event>> {
        self.execute(caller, Operation::BurnFrom { from, amount })
    }
}
