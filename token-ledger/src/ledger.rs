//! Balance bookkeeping core
//!
//! Owns balances, allowances and total supply. Mutation is split in two:
//! the `plan_*` methods read state and compute a [`Changeset`] of absolute
//! values to write, failing on any rule or overflow; [`Ledger::apply`] then
//! writes the whole changeset and cannot fail. An operation that needs several
//! plans merges them before applying, so a multi-field update is never
//! observed half done.
//!
//! # Invariants
//!
//! - Supply conservation: Σ(balances) == total_supply
//! - Zero entries are never stored; a missing key reads as zero

use crate::types::{Address, Amount};
use crate::{Error, Result};
use std::collections::HashMap;

/// Absolute field values to be written by [`Ledger::apply`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Changeset {
    balances: Vec<(Address, Amount)>,
    allowances: Vec<((Address, Address), Amount)>,
    total_supply: Option<Amount>,
}

impl Changeset {
    /// Merge another changeset into this one. Later writes to the same key win.
    pub fn merge(mut self, other: Changeset) -> Self {
        self.balances.extend(other.balances);
        self.allowances.extend(other.allowances);
        if other.total_supply.is_some() {
            self.total_supply = other.total_supply;
        }
        self
    }

    /// True when applying would change nothing
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.allowances.is_empty() && self.total_supply.is_none()
    }
}

/// Balances, allowances and total supply
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl Ledger {
    /// Empty ledger at zero supply
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from raw parts, verifying conservation
    pub fn from_parts(
        balances: impl IntoIterator<Item = (Address, Amount)>,
        allowances: impl IntoIterator<Item = ((Address, Address), Amount)>,
        total_supply: Amount,
    ) -> Result<Self> {
        let ledger = Self {
            balances: balances.into_iter().filter(|(_, v)| !v.is_zero()).collect(),
            allowances: allowances.into_iter().filter(|(_, v)| !v.is_zero()).collect(),
            total_supply,
        };
        ledger.check_conservation()?;
        Ok(ledger)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account` (zero if never credited)
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Amount `spender` may still move out of `owner`'s balance
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    /// Accounts holding a non-zero balance, sorted
    pub fn holders(&self) -> Vec<(Address, Amount)> {
        let mut holders: Vec<_> = self.balances.iter().map(|(a, v)| (*a, *v)).collect();
        holders.sort_by_key(|(a, _)| *a);
        holders
    }

    /// Non-zero allowances, sorted by (owner, spender)
    pub fn allowances(&self) -> Vec<((Address, Address), Amount)> {
        let mut entries: Vec<_> = self.allowances.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// Plan crediting `to` with freshly created supply
    pub fn plan_mint(&self, to: Address, amount: Amount) -> Result<Changeset> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let new_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        Ok(Changeset {
            balances: vec![(to, new_balance)],
            allowances: vec![],
            total_supply: Some(new_supply),
        })
    }

    /// Plan moving `amount` from `from` to `to`
    pub fn plan_move(&self, from: Address, to: Address, amount: Amount) -> Result<Changeset> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        // Moving to self changes nothing once the balance check passed
        if from == to {
            return Ok(Changeset::default());
        }

        let new_from = from_balance.checked_sub(amount).ok_or(Error::Overflow)?;
        let new_to = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        Ok(Changeset {
            balances: vec![(from, new_from), (to, new_to)],
            allowances: vec![],
            total_supply: None,
        })
    }

    /// Plan destroying `amount` of `from`'s balance
    pub fn plan_burn(&self, from: Address, amount: Amount) -> Result<Changeset> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        let new_from = from_balance.checked_sub(amount).ok_or(Error::Overflow)?;
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or_else(|| Error::InvariantViolation("burn exceeds total supply".to_string()))?;

        Ok(Changeset {
            balances: vec![(from, new_from)],
            allowances: vec![],
            total_supply: Some(new_supply),
        })
    }

    /// Plan consuming `amount` of the allowance `owner` granted `spender`
    pub fn plan_spend_allowance(
        &self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Changeset> {
        let current = self.allowance(&owner, &spender);
        if current < amount {
            return Err(Error::InsufficientAllowance);
        }

        Ok(Self::allowance_write(owner, spender, current - amount))
    }

    /// Plan overwriting an allowance
    pub fn plan_set_allowance(&self, owner: Address, spender: Address, value: Amount) -> Changeset {
        Self::allowance_write(owner, spender, value)
    }

    fn allowance_write(owner: Address, spender: Address, value: Amount) -> Changeset {
        Changeset {
            balances: vec![],
            allowances: vec![((owner, spender), value)],
            total_supply: None,
        }
    }

    /// Commit a planned changeset
    pub fn apply(&mut self, changeset: Changeset) {
        for (account, value) in changeset.balances {
            if value.is_zero() {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, value);
            }
        }

        for (key, value) in changeset.allowances {
            if value.is_zero() {
                self.allowances.remove(&key);
            } else {
                self.allowances.insert(key, value);
            }
        }

        if let Some(supply) = changeset.total_supply {
            self.total_supply = supply;
        }
    }

    /// Verify Σ(balances) == total_supply
    pub fn check_conservation(&self) -> Result<()> {
        let mut sum = Amount::zero();
        for value in self.balances.values() {
            sum = sum.checked_add(*value).ok_or_else(|| {
                Error::InvariantViolation("sum of balances overflows".to_string())
            })?;
        }

        if sum != self.total_supply {
            return Err(Error::InvariantViolation(format!(
                "sum of balances {} != total supply {}",
                sum, self.total_supply
            )));
        }

        Ok(())
    }
}
