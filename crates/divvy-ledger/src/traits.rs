//! External collaborator interfaces.
//!
//! The ledger owns only its own index state. Unit supplies and holder
//! balances live in an ownership registry, deposit permission lives in the
//! surrounding system's access control, and value transfer lives in a payout
//! sink. All three are injected, and the registry must be queried at the
//! moment of use (balances can change between any two operations).

use divvy_types::{AssetId, HolderId};

/// Read-only view of the ownership registry.
pub trait OwnershipRegistry {
    /// Total issued units for an asset. Zero for unknown assets.
    fn total_units(&self, asset_id: AssetId) -> u64;

    /// Units of `asset_id` currently owned by `holder`. Zero if none.
    fn balance(&self, asset_id: AssetId, holder: &HolderId) -> u64;
}

/// Capability check for revenue deposits.
pub trait DepositAuthority {
    /// Whether `caller` may deposit revenue into the ledger.
    fn can_deposit(&self, caller: &HolderId) -> bool;
}

/// Rejection reported by a payout sink.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{reason}")]
pub struct PayoutRejected {
    /// Human-readable rejection reason.
    pub reason: String,
}

/// Terminal value-transfer step of a claim.
///
/// A rejection aborts the enclosing ledger operation, which rolls back all
/// of its own state. Sinks must treat any transfer belonging to an operation
/// that returned an error as void (buffer until the operation completes, or
/// run inside the host's transaction).
pub trait PayoutSink {
    /// Transfer `amount` base units to `holder`.
    fn pay(&mut self, holder: &HolderId, amount: u64) -> std::result::Result<(), PayoutRejected>;
}
