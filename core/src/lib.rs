//! Synthetic card-transaction dataset generation.
//!
//! Configuration → Sampler → Field Deriver → Validator → Aggregator → export.
//! See `pipeline` for the fixed stage order and `deriver` for the draw order
//! that makes a seed reproduce the same dataset byte for byte.

pub mod aggregator;
pub mod config;
pub mod deriver;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod types;
pub mod validator;
