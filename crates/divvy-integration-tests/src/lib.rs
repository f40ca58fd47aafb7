//! Integration test crate for the Divvy ledger.
//!
//! This crate has no library code beyond a logging helper — it only
//! contains integration tests that exercise full deposit/claim flows
//! across the workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p divvy-integration-tests
//! ```

/// Initialize tracing for a test run, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
