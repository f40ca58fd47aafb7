//! Ledger entry points.
//!
//! [`Ledger`] composes the per-asset [`RevenueIndex`] and per-holder
//! [`ClaimLedger`] with the injected external collaborators. Operations are
//! fully serialized: every entry point takes `&mut self`, and a busy-flag
//! guard rejects nested entry as defense-in-depth against a payout sink
//! calling back into the ledger.
//!
//! Claims follow checks-effects-interactions: the holder's last-seen index
//! is advanced before the payout sink is invoked, and the payout is the
//! final action. A sink rejection rolls the advance back and fails the
//! operation; a batch rolls back every advance it made.

use divvy_types::{events::LedgerEvent, AssetId, HolderId};

use crate::claim::{ClaimLedger, Settlement};
use crate::index::RevenueIndex;
use crate::traits::{DepositAuthority, OwnershipRegistry, PayoutSink};
use crate::{LedgerError, Result};

/// The revenue-share ledger for one deployment.
#[derive(Debug)]
pub struct Ledger<R, A, P> {
    index: RevenueIndex,
    claims: ClaimLedger,
    registry: R,
    authority: A,
    sink: P,
    events: Vec<LedgerEvent>,
    busy: bool,
}

impl<R, A, P> Ledger<R, A, P>
where
    R: OwnershipRegistry,
    A: DepositAuthority,
    P: PayoutSink,
{
    /// Create a ledger with empty indices and the given collaborators.
    pub fn new(registry: R, authority: A, sink: P) -> Self {
        Self {
            index: RevenueIndex::new(),
            claims: ClaimLedger::new(),
            registry,
            authority,
            sink,
            events: Vec::new(),
            busy: false,
        }
    }

    /// Deposit revenue for an asset, folding it into the asset's cumulative
    /// index. No payout happens here.
    ///
    /// Returns the asset's new cumulative index (scaled).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthorized`] if `caller` lacks the deposit capability
    /// - [`LedgerError::InvalidAmount`] if `amount` is zero
    /// - [`LedgerError::NoSupply`] if the asset has no issued units
    /// - [`LedgerError::ReentrantCall`] on nested entry
    /// - [`LedgerError::Overflow`] on arithmetic overflow
    pub fn deposit(&mut self, caller: &HolderId, asset_id: AssetId, amount: u64) -> Result<u128> {
        self.enter()?;
        let result = self.deposit_inner(caller, asset_id, amount);
        self.busy = false;
        result
    }

    /// Amount currently claimable by `holder` for `asset_id`. Pure read;
    /// a holder with zero balance reads zero.
    pub fn claimable(&self, asset_id: AssetId, holder: &HolderId) -> Result<u64> {
        let balance = self.registry.balance(asset_id, holder);
        self.claims.claimable(&self.index, asset_id, holder, balance)
    }

    /// Claim the holder's accrued share for one asset.
    ///
    /// Returns the paid amount. `Ok(0)` is a successful no-op: either no
    /// new revenue has accrued, or the accrued fraction truncates below one
    /// base unit (in which case the last-seen index is left untouched so
    /// the fraction stays claimable later).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NoBalance`] if the holder owns no units of the asset
    /// - [`LedgerError::PayoutFailed`] if the sink rejects the transfer
    ///   (the index advance is rolled back)
    /// - [`LedgerError::ReentrantCall`] on nested entry
    /// - [`LedgerError::Overflow`] on arithmetic overflow
    pub fn claim(&mut self, asset_id: AssetId, holder: &HolderId) -> Result<u64> {
        self.enter()?;
        let result = self.claim_inner(asset_id, holder).map(|s| s.amount);
        self.busy = false;
        result
    }

    /// Claim across several assets in input order as one atomic operation.
    ///
    /// Duplicates are legal; a repeated asset id is a caught-up no-op on
    /// its second occurrence. If any individual claim fails, every index
    /// advance and event of the batch is rolled back and the whole call
    /// fails — there is no partial success.
    ///
    /// Returns the total paid across the batch.
    pub fn claim_batch(&mut self, asset_ids: &[AssetId], holder: &HolderId) -> Result<u64> {
        self.enter()?;
        let result = self.claim_batch_inner(asset_ids, holder);
        self.busy = false;
        result
    }

    /// The asset's current cumulative index (scaled).
    pub fn cumulative_index(&self, asset_id: AssetId) -> u128 {
        self.index.cumulative(asset_id)
    }

    /// The index value already credited to `holder` for `asset_id`.
    pub fn last_index(&self, asset_id: AssetId, holder: &HolderId) -> u128 {
        self.claims.last_index(asset_id, holder)
    }

    /// Accumulated rounding dust for the asset, in scaled units.
    pub fn retained_dust(&self, asset_id: AssetId) -> u128 {
        self.index.retained_dust(asset_id)
    }

    /// Drain the pending event log, oldest first.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// The injected ownership registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the registry (test setups adjust stub balances).
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// The injected payout sink.
    pub fn sink(&self) -> &P {
        &self.sink
    }

    fn enter(&mut self) -> Result<()> {
        if self.busy {
            return Err(LedgerError::ReentrantCall);
        }
        self.busy = true;
        Ok(())
    }

    fn deposit_inner(&mut self, caller: &HolderId, asset_id: AssetId, amount: u64) -> Result<u128> {
        if !self.authority.can_deposit(caller) {
            return Err(LedgerError::NotAuthorized);
        }
        // Supply must be read fresh at deposit time.
        let total_units = self.registry.total_units(asset_id);
        let new_index = self.index.apply_deposit(asset_id, amount, total_units)?;
        self.events.push(LedgerEvent::RevenueDeposited {
            asset_id,
            amount,
            new_index,
        });
        tracing::debug!(asset_id, amount, new_index, "revenue deposited");
        Ok(new_index)
    }

    fn claim_inner(&mut self, asset_id: AssetId, holder: &HolderId) -> Result<Settlement> {
        // Balance must be read fresh at claim time.
        let balance = self.registry.balance(asset_id, holder);
        if balance == 0 {
            return Err(LedgerError::NoBalance { asset_id });
        }

        let cumulative = self.index.cumulative(asset_id);
        let settlement = self.claims.settle(asset_id, holder, balance, cumulative)?;
        if settlement.amount == 0 {
            tracing::trace!(asset_id, holder = %short_hex(holder), "nothing to claim");
            return Ok(settlement);
        }

        // The truncated sub-unit fraction becomes dust with the advance.
        self.index.record_dust(asset_id, settlement.truncated);

        // State is advanced; the external transfer is the final action.
        if let Err(rejected) = self.sink.pay(holder, settlement.amount) {
            self.claims.rollback(asset_id, holder, settlement.prior_index);
            self.index.unrecord_dust(asset_id, settlement.truncated);
            tracing::warn!(
                asset_id,
                holder = %short_hex(holder),
                amount = settlement.amount,
                reason = %rejected,
                "payout rejected, claim rolled back"
            );
            return Err(LedgerError::PayoutFailed {
                reason: rejected.reason,
            });
        }

        self.events.push(LedgerEvent::RevenueClaimed {
            asset_id,
            holder: *holder,
            amount: settlement.amount,
        });
        tracing::info!(
            asset_id,
            holder = %short_hex(holder),
            amount = settlement.amount,
            new_index = settlement.new_index,
            "revenue claimed"
        );
        Ok(settlement)
    }

    fn claim_batch_inner(&mut self, asset_ids: &[AssetId], holder: &HolderId) -> Result<u64> {
        let events_mark = self.events.len();
        let mut advances: Vec<(AssetId, u128, u128)> = Vec::new();
        let mut total: u64 = 0;

        for &asset_id in asset_ids {
            // Record the advance before touching the running total, so every
            // committed settlement is covered by the rollback list.
            let step = self.claim_inner(asset_id, holder).and_then(|settlement| {
                if settlement.amount > 0 {
                    advances.push((asset_id, settlement.prior_index, settlement.truncated));
                }
                total
                    .checked_add(settlement.amount)
                    .ok_or(LedgerError::Overflow)
            });
            match step {
                Ok(sum) => total = sum,
                Err(err) => {
                    self.rollback_batch(&advances, holder, events_mark);
                    tracing::warn!(
                        asset_id,
                        holder = %short_hex(holder),
                        error = %err,
                        "batch claim failed, all claims rolled back"
                    );
                    return Err(err);
                }
            }
        }
        Ok(total)
    }

    fn rollback_batch(
        &mut self,
        advances: &[(AssetId, u128, u128)],
        holder: &HolderId,
        events_mark: usize,
    ) {
        for &(asset_id, prior, truncated) in advances.iter().rev() {
            self.claims.rollback(asset_id, holder, prior);
            self.index.unrecord_dust(asset_id, truncated);
        }
        self.events.truncate(events_mark);
    }
}

/// Truncated hex rendering of a holder id for log fields.
fn short_hex(holder: &HolderId) -> String {
    hex::encode(&holder[..8])
}
