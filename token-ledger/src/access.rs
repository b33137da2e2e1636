//! Roles and the pause switch
//!
//! `AccessControl` holds the owner, the mint agent set and the paused flag.
//! Every other component asks it first: `ensure_*` guards are read-only and
//! run before any ledger planning.

use crate::types::Address;
use crate::{Error, Result};
use std::collections::HashSet;

/// Owner, mint agents and pause state
#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: Address,
    mint_agents: HashSet<Address>,
    paused: bool,
}

impl AccessControl {
    /// Fresh access state for a ledger deployed by `deployer`.
    ///
    /// The deployer starts out as owner and as a registered mint agent.
    pub fn new(deployer: Address) -> Result<Self> {
        if deployer.is_zero() {
            return Err(Error::InvalidAddress);
        }

        let mut mint_agents = HashSet::new();
        mint_agents.insert(deployer);

        Ok(Self {
            owner: deployer,
            mint_agents,
            paused: false,
        })
    }

    /// Rebuild from raw parts (snapshot restore)
    pub fn from_parts(
        owner: Address,
        mint_agents: impl IntoIterator<Item = Address>,
        paused: bool,
    ) -> Result<Self> {
        if owner.is_zero() {
            return Err(Error::InvariantViolation("owner is the null address".to_string()));
        }

        Ok(Self {
            owner,
            mint_agents: mint_agents.into_iter().collect(),
            paused,
        })
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `account` may mint
    pub fn is_mint_agent(&self, account: &Address) -> bool {
        self.mint_agents.contains(account)
    }

    /// Registered mint agents, sorted
    pub fn mint_agents(&self) -> Vec<Address> {
        let mut agents: Vec<_> = self.mint_agents.iter().copied().collect();
        agents.sort();
        agents
    }

    /// Whether value movement is stopped
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fail unless `caller` is the owner
    pub fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Fail unless `caller` is a registered mint agent
    pub fn ensure_mint_agent(&self, caller: &Address) -> Result<()> {
        if !self.is_mint_agent(caller) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    /// Fail while paused
    pub fn ensure_running(&self) -> Result<()> {
        if self.paused {
            return Err(Error::Paused);
        }
        Ok(())
    }

    /// Grant or revoke mint rights. Owner only.
    pub fn set_mint_agent(&mut self, caller: &Address, agent: Address, enabled: bool) -> Result<()> {
        self.ensure_owner(caller)?;

        if enabled {
            self.mint_agents.insert(agent);
        } else {
            self.mint_agents.remove(&agent);
        }

        tracing::info!(%agent, enabled, "Mint agent updated");
        Ok(())
    }

    /// Hand the owner role to `new_owner`. Owner only; never to the null address.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(Error::InvalidAddress);
        }

        let previous = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(%previous, %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Pause value movement. Owner only; idempotent.
    pub fn stop(&mut self, caller: &Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.paused {
            tracing::info!(by = %caller, "Ledger stopped");
        }
        self.paused = true;
        Ok(())
    }

    /// Resume value movement. Owner only; idempotent.
    pub fn start(&mut self, caller: &Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.paused {
            tracing::info!(by = %caller, "Ledger started");
        }
        self.paused = false;
        Ok(())
    }
}
