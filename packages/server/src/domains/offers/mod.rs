//! Offers domain - campaign entities synced from the network API

pub mod models;

pub use models::{Offer, OfferStatus};
