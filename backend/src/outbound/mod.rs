//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **ledger**: in-memory implementation of the six contract ports
//! - **wallet**: fixed-account wallet provider
//! - **ipfs**: IPFS HTTP API blob store
//! - **relay**: portal-side client of the prescription mail relay
//! - **prescription**: relay-side PDF renderer, spool, and SMTP mailer
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub(crate) mod http_support;
pub mod ipfs;
pub mod ledger;
pub mod prescription;
pub mod relay;
pub mod wallet;
