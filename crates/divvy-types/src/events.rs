//! Ledger event types for observers and indexers.
//!
//! Every successful state-changing ledger operation appends one event. A
//! no-op claim (nothing new to distribute) changes no state and emits
//! nothing.

use serde::{Deserialize, Serialize};

use crate::{AssetId, HolderId};

/// Events produced by the revenue-share ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Revenue was deposited and folded into an asset's cumulative index.
    RevenueDeposited {
        /// The asset the revenue belongs to.
        asset_id: AssetId,
        /// Deposited amount in base units.
        amount: u64,
        /// The asset's cumulative index after the deposit (scaled).
        new_index: u128,
    },

    /// A holder claimed their accrued share of an asset's revenue.
    RevenueClaimed {
        /// The asset the claim was made against.
        asset_id: AssetId,
        /// The claiming holder.
        holder: HolderId,
        /// Paid-out amount in base units.
        amount: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = LedgerEvent::RevenueDeposited {
            asset_id: 7,
            amount: 1_000,
            new_index: 42 * crate::SCALE,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("revenue_deposited"));
        let back: LedgerEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_claim_event_tag() {
        let event = LedgerEvent::RevenueClaimed {
            asset_id: 1,
            holder: [0xAB; 32],
            amount: 500,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("revenue_claimed"));
    }
}
