//! Supply destruction

use crate::access::AccessControl;
use crate::ledger::Ledger;
use crate::types::{Address, Amount, Event};
use crate::Result;

/// Destroy `amount` of the caller's own balance
pub fn burn(
    access: &AccessControl,
    ledger: &mut Ledger,
    caller: &Address,
    amount: Amount,
) -> Result<Vec<Event>> {
    access.ensure_running()?;

    let plan = ledger.plan_burn(*caller, amount)?;
    ledger.apply(plan);

    Ok(vec![Event::Burn {
        from: *caller,
        amount,
    }])
}

/// Destroy `amount` of `from`'s balance, spending the allowance `from` granted `caller`
pub fn burn_from(
    access: &AccessControl,
    ledger: &mut Ledger,
    caller: &Address,
    from: Address,
    amount: Amount,
) -> Result<Vec<Event>> {
    access.ensure_running()?;

    let spend = ledger.plan_spend_allowance(from, *caller, amount)?;
    let destruction = ledger.plan_burn(from, amount)?;
    ledger.apply(destruction.merge(spend));

    Ok(vec![Event::Burn { from, amount }])
}
