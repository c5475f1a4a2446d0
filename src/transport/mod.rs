// src/transport/mod.rs

pub mod sync_transport;

pub use sync_transport::SyncTransport;
