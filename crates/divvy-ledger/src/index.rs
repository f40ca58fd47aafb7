//! Per-asset cumulative revenue index.
//!
//! Each deposit of `amount` base units against an asset with `total_units`
//! issued units advances the asset's index by
//!
//! ```text
//! delta = floor(amount * SCALE / total_units)
//! ```
//!
//! The index is monotonically non-decreasing and never deleted; an asset
//! that has never received a deposit reads as zero. The floor division
//! leaves a remainder of less than `total_units` scaled units per deposit
//! (under one base unit of revenue per unit of supply), which is retained
//! as ledger dust rather than credited to any holder.

use std::collections::HashMap;

use divvy_types::{AssetId, SCALE};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Result};

/// Cumulative revenue-per-unit indices, one per asset.
///
/// Serializable as-is: the on-disk layout of the ledger core is exactly
/// these two per-asset mappings plus [`crate::claim::ClaimLedger`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RevenueIndex {
    /// Scaled cumulative index per asset.
    cumulative: HashMap<AssetId, u128>,
    /// Accumulated undistributed remainder per asset, in scaled units.
    dust: HashMap<AssetId, u128>,
}

impl RevenueIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The asset's current cumulative index (scaled). Zero if the asset has
    /// never received a deposit.
    pub fn cumulative(&self, asset_id: AssetId) -> u128 {
        self.cumulative.get(&asset_id).copied().unwrap_or(0)
    }

    /// Accumulated rounding dust for the asset, in scaled units.
    ///
    /// Covers both deposit remainders and the sub-unit fractions truncated
    /// away when a paying claim advances a holder's last-seen index.
    /// Dividing by [`SCALE`] yields the permanently undistributed revenue
    /// in base units.
    pub fn retained_dust(&self, asset_id: AssetId) -> u128 {
        self.dust.get(&asset_id).copied().unwrap_or(0)
    }

    /// Add permanently undistributed scaled units to the asset's dust pool.
    ///
    /// The pool is an observability counter, so it saturates rather than
    /// failing an operation whose index advance is already committed.
    pub(crate) fn record_dust(&mut self, asset_id: AssetId, scaled: u128) {
        if scaled == 0 {
            return;
        }
        let dust = self.retained_dust(asset_id).saturating_add(scaled);
        self.dust.insert(asset_id, dust);
    }

    /// Remove scaled units from the dust pool when the recording operation
    /// is rolled back.
    pub(crate) fn unrecord_dust(&mut self, asset_id: AssetId, scaled: u128) {
        let dust = self.retained_dust(asset_id).saturating_sub(scaled);
        self.dust.insert(asset_id, dust);
    }

    /// Fold a deposit into the asset's cumulative index.
    ///
    /// Returns the new index value.
    ///
    /// # Arguments
    ///
    /// * `asset_id` - The asset the revenue belongs to
    /// * `amount` - Deposited revenue in base units
    /// * `total_units` - Issued units at deposit time, queried fresh
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is zero
    /// - [`LedgerError::NoSupply`] if `total_units` is zero
    /// - [`LedgerError::Overflow`] on arithmetic overflow
    pub fn apply_deposit(
        &mut self,
        asset_id: AssetId,
        amount: u64,
        total_units: u64,
    ) -> Result<u128> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if total_units == 0 {
            return Err(LedgerError::NoSupply { asset_id });
        }

        let scaled = (amount as u128)
            .checked_mul(SCALE)
            .ok_or(LedgerError::Overflow)?;
        let delta = scaled / total_units as u128;
        let remainder = scaled - delta * total_units as u128;

        let new_index = self
            .cumulative(asset_id)
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;
        self.cumulative.insert(asset_id, new_index);

        self.record_dust(asset_id, remainder);

        tracing::trace!(
            asset_id,
            amount,
            total_units,
            delta,
            new_index,
            "revenue index advanced"
        );

        Ok(new_index)
    }
}
