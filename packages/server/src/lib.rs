// Marketing Operations Backend - API Core
//
// This crate provides the backend API for offer/advertiser management and
// synchronization against the Everflow affiliate-network API.
// Architecture follows domain-driven design; the sync pipeline lives in
// domains/sync.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
