//! Ledger adapters for the contract capability ports.
//!
//! No Ethereum client is wired in yet; the in-memory ledger backs local runs
//! and tests.

mod in_memory;

pub use in_memory::{InMemoryLedger, SentTransaction};
