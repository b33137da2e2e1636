//! Value movement and allowances
//!
//! Stateless: each function takes the access state and the ledger it acts on.

use crate::access::AccessControl;
use crate::ledger::Ledger;
use crate::types::{Address, Amount, Event};
use crate::{Error, Result};

/// Move `amount` from `caller` to `to`
pub fn transfer(
    access: &AccessControl,
    ledger: &mut Ledger,
    caller: &Address,
    to: Address,
    amount: Amount,
) -> Result<Vec<Event>> {
    access.ensure_running()?;
    if to.is_zero() {
        return Err(Error::InvalidAddress);
    }

    let plan = ledger.plan_move(*caller, to, amount)?;
    ledger.apply(plan);

    Ok(vec![Event::Transfer {
        from: *caller,
        to,
        value: amount,
    }])
}

/// Set the allowance `caller` grants `spender`, replacing any previous value
pub fn approve(ledger: &mut Ledger, caller: &Address, spender: Address, amount: Amount) -> Vec<Event> {
    let plan = ledger.plan_set_allowance(*caller, spender, amount);
    ledger.apply(plan);

    vec![Event::Approval {
        owner: *caller,
        spender,
        value: amount,
    }]
}

/// Raise the allowance `caller` grants `spender` by `added`
pub fn increase_allowance(
    ledger: &mut Ledger,
    caller: &Address,
    spender: Address,
    added: Amount,
) -> Result<Vec<Event>> {
    let value = ledger
        .allowance(caller, &spender)
        .checked_add(added)
        .ok_or(Error::Overflow)?;
    Ok(approve(ledger, caller, spender, value))
}

/// Lower the allowance `caller` grants `spender` by `subtracted`, stopping at zero
pub fn decrease_allowance(
    ledger: &mut Ledger,
    caller: &Address,
    spender: Address,
    subtracted: Amount,
) -> Vec<Event> {
    let value = ledger.allowance(caller, &spender).saturating_sub(subtracted);
    approve(ledger, caller, spender, value)
}

/// Move `amount` from `from` to `to`, spending the allowance `from` granted `caller`.
///
/// Balance, destination balance and allowance are written as one changeset.
/// Emits a single `Transfer`; the allowance decrease is not reported.
pub fn transfer_from(
    access: &AccessControl,
    ledger: &mut Ledger,
    caller: &Address,
    from: Address,
    to: Address,
    amount: Amount,
) -> Result<Vec<Event>> {
    access.ensure_running()?;
    if to.is_zero() {
        return Err(Error::InvalidAddress);
    }

    let spend = ledger.plan_spend_allowance(from, *caller, amount)?;
    let movement = ledger.plan_move(from, to, amount)?;
    ledger.apply(movement.merge(spend));

    Ok(vec![Event::Transfer {
        from,
        to,
        value: amount,
    }])
}
