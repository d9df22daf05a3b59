//! Loyalty ledger arithmetic.

use serde_json::Value;

use crate::models::Customer;

/// Purchases needed to earn one redeemable discount unit.
pub const PURCHASES_PER_REWARD: u32 = 3;

/// Units earned so far, net of redemptions. Never negative.
pub fn balance(purchases: u32, redeemed: u32) -> u32 {
    (purchases / PURCHASES_PER_REWARD).saturating_sub(redeemed)
}

/// Purchase count at which the next unit is earned. Widened so the counter's top values still
/// have a threshold.
pub fn next_threshold(purchases: u32) -> u64 {
    let per_reward = u64::from(PURCHASES_PER_REWARD);
    (u64::from(purchases) / per_reward + 1) * per_reward
}

/// Interprets a caller-supplied purchase count; anything other than a positive integer is 1.
/// Large counts pass through unclamped so the ledger can refuse them.
pub fn coerce_purchase_count(input: Option<&Value>) -> u64 {
    let parsed = match input {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= 1 => n,
        _ => 1,
    }
}

/// The purchase counter cannot hold the requested total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseOverflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    Redeemed,
    NothingToRedeem,
}

impl Customer {
    pub fn balance(&self) -> u32 {
        balance(self.purchases, self.redeemed)
    }

    pub fn next_threshold(&self) -> u64 {
        next_threshold(self.purchases)
    }

    /// Leaves the ledger untouched when the new total does not fit.
    pub fn add_purchases(&mut self, count: u64) -> Result<(), PurchaseOverflow> {
        let total = u32::try_from(count)
            .ok()
            .and_then(|count| self.purchases.checked_add(count))
            .ok_or(PurchaseOverflow)?;
        self.purchases = total;
        Ok(())
    }

    /// Consumes one unit if any is available; a zero balance is a no-op.
    pub fn redeem(&mut self) -> RedeemOutcome {
        if self.balance() == 0 {
            return RedeemOutcome::NothingToRedeem;
        }
        self.redeemed += 1;
        RedeemOutcome::Redeemed
    }
}
