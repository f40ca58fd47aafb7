//! # divvy-types
//!
//! Shared domain types for the Divvy revenue-share workspace.
//!
//! Divvy distributes periodic revenue (rent, royalties, fees) among holders
//! of fractional ownership units. Amounts are unsigned integers in the
//! smallest payment denomination; per-unit revenue indices are fixed-point
//! values scaled by [`SCALE`].

pub mod events;

/// Identifier of a fractionalized asset.
pub type AssetId = u64;

/// Identifier of a unit holder (account hash).
pub type HolderId = [u8; 32];

/// Fixed-point scale factor for revenue-per-unit indices.
///
/// A cumulative index of `SCALE` means exactly one base unit of revenue has
/// been distributed per ownership unit. `u128` index arithmetic at this
/// scale leaves headroom of roughly `3.4e20` base units of revenue per unit
/// of supply before overflow.
pub const SCALE: u128 = 1_000_000_000_000_000_000;
