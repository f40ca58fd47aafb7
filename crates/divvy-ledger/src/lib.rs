//! # divvy-ledger
//!
//! Revenue-share accounting for fractional ownership units.
//!
//! The ledger distributes deposited revenue proportionally among an asset's
//! unit holders without ever iterating over the holder set. Each asset
//! carries a cumulative revenue-per-unit index; each (asset, holder) pair
//! carries the index value already credited to that holder. A deposit
//! advances the asset index in O(1); a claim settles the difference between
//! the two indices in O(1), independent of holder count.
//!
//! ## Modules
//!
//! - [`index`] — Per-asset cumulative revenue index
//! - [`claim`] — Per-holder last-seen index and claim settlement
//! - [`ledger`] — Entry points composing the two with external collaborators
//! - [`traits`] — Ownership registry, deposit authority, payout sink
//! - [`stub`] — In-memory collaborator implementations for tests

pub mod claim;
pub mod index;
pub mod ledger;
pub mod stub;
pub mod traits;

pub use ledger::Ledger;

use divvy_types::AssetId;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Deposit amount was zero.
    #[error("deposit amount must be positive")]
    InvalidAmount,

    /// Deposit against an asset with no issued units.
    #[error("asset {asset_id} has no issued units")]
    NoSupply {
        /// The asset the deposit targeted.
        asset_id: AssetId,
    },

    /// Claim by a holder with no units of the asset.
    #[error("holder has no units of asset {asset_id}")]
    NoBalance {
        /// The asset the claim targeted.
        asset_id: AssetId,
    },

    /// The payout sink rejected the terminal transfer.
    #[error("payout rejected: {reason}")]
    PayoutFailed {
        /// Rejection reason reported by the sink.
        reason: String,
    },

    /// Caller lacks the deposit capability.
    #[error("caller is not authorized to deposit revenue")]
    NotAuthorized,

    /// A ledger entry point was re-entered while an operation was in flight.
    #[error("reentrant ledger call rejected")]
    ReentrantCall,

    /// Arithmetic overflow in index calculation.
    #[error("arithmetic overflow in index calculation")]
    Overflow,
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
