//! Supply growth and the one-way minting lock

use crate::access::AccessControl;
use crate::ledger::Ledger;
use crate::types::{Address, Amount, Event};
use crate::{Error, Result};

/// Governs `mint` and `finish_minting`
#[derive(Debug, Clone, Default)]
pub struct MintController {
    finished: bool,
    cap: Option<Amount>,
}

impl MintController {
    /// Controller with an optional supply cap
    pub fn new(cap: Option<Amount>) -> Self {
        Self {
            finished: false,
            cap,
        }
    }

    /// Rebuild from raw parts (snapshot restore)
    pub fn from_parts(finished: bool, cap: Option<Amount>) -> Self {
        Self { finished, cap }
    }

    /// Whether minting is permanently disabled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Configured supply cap
    pub fn cap(&self) -> Option<Amount> {
        self.cap
    }

    /// Create `amount` new units for `to`.
    ///
    /// Checks run in this order: mint agent, minting finished, paused,
    /// null destination, zero amount, overflow, cap. Emits `Mint` then a
    /// `Transfer` from the null address.
    pub fn mint(
        &self,
        access: &AccessControl,
        ledger: &mut Ledger,
        caller: &Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<Event>> {
        access.ensure_mint_agent(caller)?;
        if self.finished {
            return Err(Error::MintingFinished);
        }
        access.ensure_running()?;
        if to.is_zero() {
            return Err(Error::InvalidAddress);
        }
        if amount.is_zero() {
            return Err(Error::InvalidAmount);
        }

        let plan = ledger.plan_mint(to, amount)?;
        if let Some(cap) = self.cap {
            // plan_mint already proved this addition cannot overflow
            if ledger.total_supply() + amount > cap {
                return Err(Error::CapExceeded);
            }
        }

        ledger.apply(plan);

        Ok(vec![
            Event::Mint { to, amount },
            Event::Transfer {
                from: Address::ZERO,
                to,
                value: amount,
            },
        ])
    }

    /// Permanently disable minting. Owner only; repeat calls are no-ops.
    pub fn finish_minting(&mut self, access: &AccessControl, caller: &Address) -> Result<()> {
        access.ensure_owner(caller)?;
        if !self.finished {
            self.finished = true;
            tracing::info!(by = %caller, "Minting finished");
        }
        Ok(())
    }
}
