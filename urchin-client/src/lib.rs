//! Urchin Client - record-store access for the catalog console
//!
//! Provides the [`RecordStore`] trait the console core is written against,
//! plus an HTTP implementation speaking to the remote record store.

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::ClientConfig;
pub use error::{StoreError, StoreResult};
pub use http::{HttpStore, encode_predicate};
pub use store::RecordStore;
