//! Per-holder last-seen index and claim settlement.
//!
//! For each (asset, holder) pair the ledger stores the cumulative index
//! value already credited to that holder. A claim settles the difference:
//!
//! ```text
//! owed = floor(balance * (cumulative - last) / SCALE)
//! ```
//!
//! The last-seen index only advances when a claim actually pays out. A
//! claim whose owed amount truncates to zero leaves the index untouched so
//! the sub-unit credit remains claimable once more revenue accrues.

use std::collections::HashMap;

use divvy_types::{AssetId, HolderId, SCALE};
use serde::{Deserialize, Serialize};

use crate::index::RevenueIndex;
use crate::{LedgerError, Result};

/// Outcome of settling one (asset, holder) pair against the current index.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Settlement {
    /// Amount owed to the holder in base units (zero for a no-op).
    pub amount: u64,
    /// Last-seen index before the settlement, for rollback.
    pub prior_index: u128,
    /// Last-seen index after the settlement.
    pub new_index: u128,
    /// Sub-unit fraction discarded by the advance, in scaled units. Becomes
    /// ledger dust once the claim's payout succeeds.
    pub truncated: u128,
}

/// Last-seen revenue indices, one per (asset, holder) pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimLedger {
    last: HashMap<(AssetId, HolderId), u128>,
}

impl ClaimLedger {
    /// Create an empty claim ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index value already credited to `holder` for `asset_id`. Zero if
    /// the pair has never claimed.
    pub fn last_index(&self, asset_id: AssetId, holder: &HolderId) -> u128 {
        self.last.get(&(asset_id, *holder)).copied().unwrap_or(0)
    }

    /// Amount currently claimable by `holder` for `asset_id`, given the
    /// holder's fresh balance. Pure read.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Overflow`] on arithmetic overflow
    pub fn claimable(
        &self,
        index: &RevenueIndex,
        asset_id: AssetId,
        holder: &HolderId,
        balance: u64,
    ) -> Result<u64> {
        if balance == 0 {
            return Ok(0);
        }
        let delta = self.delta_index(index, asset_id, holder)?;
        accrued(balance, delta)
    }

    /// Settle the pair against `cumulative`, advancing the last-seen index
    /// only when the owed amount is non-zero.
    pub(crate) fn settle(
        &mut self,
        asset_id: AssetId,
        holder: &HolderId,
        balance: u64,
        cumulative: u128,
    ) -> Result<Settlement> {
        let prior = self.last_index(asset_id, holder);
        let delta = cumulative
            .checked_sub(prior)
            .ok_or(LedgerError::Overflow)?;
        let scaled = (balance as u128)
            .checked_mul(delta)
            .ok_or(LedgerError::Overflow)?;
        let amount = u64::try_from(scaled / SCALE).map_err(|_| LedgerError::Overflow)?;
        if amount == 0 {
            // Nothing payable: keep the fractional credit for later.
            return Ok(Settlement {
                amount: 0,
                prior_index: prior,
                new_index: prior,
                truncated: 0,
            });
        }
        self.last.insert((asset_id, *holder), cumulative);
        Ok(Settlement {
            amount,
            prior_index: prior,
            new_index: cumulative,
            truncated: scaled % SCALE,
        })
    }

    /// Restore the pair's last-seen index after a failed payout.
    pub(crate) fn rollback(&mut self, asset_id: AssetId, holder: &HolderId, prior: u128) {
        self.last.insert((asset_id, *holder), prior);
    }

    fn delta_index(
        &self,
        index: &RevenueIndex,
        asset_id: AssetId,
        holder: &HolderId,
    ) -> Result<u128> {
        index
            .cumulative(asset_id)
            .checked_sub(self.last_index(asset_id, holder))
            .ok_or(LedgerError::Overflow)
    }
}

/// `floor(balance * delta_index / SCALE)` in base units.
fn accrued(balance: u64, delta_index: u128) -> Result<u64> {
    let scaled = (balance as u128)
        .checked_mul(delta_index)
        .ok_or(LedgerError::Overflow)?;
    u64::try_from(scaled / SCALE).map_err(|_| LedgerError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDER: HolderId = [0x11; 32];

    #[test]
    fn test_claimable_zero_balance_is_zero() {
        let mut index = RevenueIndex::new();
        index.apply_deposit(1, 1000, 10).expect("deposit");
        let claims = ClaimLedger::new();
        assert_eq!(claims.claimable(&index, 1, &HOLDER, 0).expect("view"), 0);
    }

    #[test]
    fn test_claimable_proportional_to_balance() {
        let mut index = RevenueIndex::new();
        // 1000 base units over 1000 units of supply: one per unit.
        index.apply_deposit(1, 1000, 1000).expect("deposit");
        let claims = ClaimLedger::new();
        assert_eq!(claims.claimable(&index, 1, &HOLDER, 400).expect("view"), 400);
        assert_eq!(claims.claimable(&index, 1, &HOLDER, 600).expect("view"), 600);
    }

    #[test]
    fn test_settle_advances_last_index() {
        let mut index = RevenueIndex::new();
        index.apply_deposit(1, 1000, 1000).expect("deposit");
        let mut claims = ClaimLedger::new();
        let s = claims
            .settle(1, &HOLDER, 400, index.cumulative(1))
            .expect("settle");
        assert_eq!(s.amount, 400);
        assert_eq!(s.prior_index, 0);
        assert_eq!(s.new_index, index.cumulative(1));
        assert_eq!(claims.last_index(1, &HOLDER), index.cumulative(1));
    }

    #[test]
    fn test_settle_caught_up_is_noop() {
        let mut index = RevenueIndex::new();
        index.apply_deposit(1, 1000, 1000).expect("deposit");
        let mut claims = ClaimLedger::new();
        claims
            .settle(1, &HOLDER, 400, index.cumulative(1))
            .expect("first settle");
        let s = claims
            .settle(1, &HOLDER, 400, index.cumulative(1))
            .expect("second settle");
        assert_eq!(s.amount, 0);
        assert_eq!(s.prior_index, s.new_index);
    }

    #[test]
    fn test_settle_truncated_to_zero_withholds_advance() {
        let mut index = RevenueIndex::new();
        // 1 base unit over a huge supply: delta is tiny but non-zero.
        index.apply_deposit(1, 1, 1_000_000_000).expect("deposit");
        let mut claims = ClaimLedger::new();
        let cumulative = index.cumulative(1);
        assert!(cumulative > 0);
        let s = claims
            .settle(1, &HOLDER, 1, cumulative)
            .expect("settle");
        assert_eq!(s.amount, 0);
        // The last-seen index must not advance past unpaid credit.
        assert_eq!(claims.last_index(1, &HOLDER), 0);
    }

    #[test]
    fn test_withheld_fraction_pays_out_eventually() {
        let mut index = RevenueIndex::new();
        let mut claims = ClaimLedger::new();
        // One deposit credits the single-unit holder half a base unit.
        index.apply_deposit(1, 1, 2).expect("first deposit");
        let s = claims
            .settle(1, &HOLDER, 1, index.cumulative(1))
            .expect("settle");
        assert_eq!(s.amount, 0);
        // The second half-unit completes a payable whole unit.
        index.apply_deposit(1, 1, 2).expect("second deposit");
        assert_eq!(index.cumulative(1), SCALE);
        let s = claims
            .settle(1, &HOLDER, 1, index.cumulative(1))
            .expect("settle");
        assert_eq!(s.amount, 1);
    }

    #[test]
    fn test_rollback_restores_prior_index() {
        let mut index = RevenueIndex::new();
        index.apply_deposit(1, 1000, 1000).expect("deposit");
        let mut claims = ClaimLedger::new();
        let s = claims
            .settle(1, &HOLDER, 400, index.cumulative(1))
            .expect("settle");
        claims.rollback(1, &HOLDER, s.prior_index);
        assert_eq!(claims.last_index(1, &HOLDER), 0);
        assert_eq!(
            claims.claimable(&index, 1, &HOLDER, 400).expect("view"),
            400
        );
    }
}
