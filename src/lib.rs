//! Wallet flow analysis for blockchain forensics.
//!
//! Takes a wallet's normalized transaction batch and derives flagged
//! anomalies (large transfers, blacklisted counterparties, rapid
//! pass-through) and node/link graphs, either of the whole batch or of the
//! n-hop neighborhood around a focal address.

pub mod anomaly;
pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod graph;
pub mod ingest;
pub mod pipeline;
pub mod summary;
