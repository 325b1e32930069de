//! IPFS outbound adapters.
//!
//! Provides a thin HTTP implementation of the `BlobStore` port.

mod dto;
mod http_store;

pub use http_store::IpfsHttpBlobStore;
