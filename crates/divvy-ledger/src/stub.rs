//! In-memory collaborator implementations.
//!
//! The real ownership registry, access control, and payment rail live in the
//! surrounding system. These stubs stand in for them in unit and integration
//! tests, with dev setters for balances, supplies, and sink behavior.

use std::collections::{HashMap, HashSet};

use divvy_types::{AssetId, HolderId};

use crate::traits::{DepositAuthority, OwnershipRegistry, PayoutRejected, PayoutSink};

/// A settable in-memory ownership registry.
#[derive(Clone, Debug, Default)]
pub struct StubRegistry {
    supplies: HashMap<AssetId, u64>,
    balances: HashMap<(AssetId, HolderId), u64>,
}

impl StubRegistry {
    /// Create an empty registry (all supplies and balances zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total issued units for an asset.
    pub fn set_supply(&mut self, asset_id: AssetId, total_units: u64) {
        self.supplies.insert(asset_id, total_units);
    }

    /// Set a holder's unit balance for an asset.
    pub fn set_balance(&mut self, asset_id: AssetId, holder: &HolderId, units: u64) {
        self.balances.insert((asset_id, *holder), units);
    }
}

impl OwnershipRegistry for StubRegistry {
    fn total_units(&self, asset_id: AssetId) -> u64 {
        self.supplies.get(&asset_id).copied().unwrap_or(0)
    }

    fn balance(&self, asset_id: AssetId, holder: &HolderId) -> u64 {
        self.balances.get(&(asset_id, *holder)).copied().unwrap_or(0)
    }
}

/// A capability check backed by an explicit allow set, or allowing everyone.
#[derive(Clone, Debug)]
pub struct StubAuthority {
    allowed: Option<HashSet<HolderId>>,
}

impl StubAuthority {
    /// Authority that lets any caller deposit.
    pub fn allow_all() -> Self {
        Self { allowed: None }
    }

    /// Authority that lets only the listed callers deposit.
    pub fn allowing(callers: &[HolderId]) -> Self {
        Self {
            allowed: Some(callers.iter().copied().collect()),
        }
    }
}

impl DepositAuthority for StubAuthority {
    fn can_deposit(&self, caller: &HolderId) -> bool {
        match &self.allowed {
            None => true,
            Some(set) => set.contains(caller),
        }
    }
}

/// A payout sink that records transfers, optionally rejecting them all.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Recorded payouts in call order.
    payouts: Vec<(HolderId, u64)>,
    reject_with: Option<String>,
}

impl RecordingSink {
    /// A sink that accepts and records every transfer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every transfer with the given reason.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            payouts: Vec::new(),
            reject_with: Some(reason.to_string()),
        }
    }

    /// Recorded payouts in call order.
    pub fn payouts(&self) -> &[(HolderId, u64)] {
        &self.payouts
    }

    /// Sum of all recorded payouts.
    pub fn total_paid(&self) -> u64 {
        self.payouts.iter().map(|(_, amount)| amount).sum()
    }
}

impl PayoutSink for RecordingSink {
    fn pay(&mut self, holder: &HolderId, amount: u64) -> std::result::Result<(), PayoutRejected> {
        if let Some(reason) = &self.reject_with {
            return Err(PayoutRejected {
                reason: reason.clone(),
            });
        }
        self.payouts.push((*holder, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults_to_zero() {
        let registry = StubRegistry::new();
        assert_eq!(registry.total_units(1), 0);
        assert_eq!(registry.balance(1, &[0x01; 32]), 0);
    }

    #[test]
    fn test_authority_allow_set() {
        let manager = [0x01; 32];
        let authority = StubAuthority::allowing(&[manager]);
        assert!(authority.can_deposit(&manager));
        assert!(!authority.can_deposit(&[0x02; 32]));
        assert!(StubAuthority::allow_all().can_deposit(&[0x02; 32]));
    }

    #[test]
    fn test_rejecting_sink_records_nothing() {
        let mut sink = RecordingSink::rejecting("offline");
        assert!(sink.pay(&[0x01; 32], 100).is_err());
        assert!(sink.payouts().is_empty());
        assert_eq!(sink.total_paid(), 0);
    }
}
