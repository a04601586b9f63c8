pub mod sync_advertisers;
pub mod sync_offers;

pub use sync_advertisers::sync_advertisers_from_everflow;
pub use sync_offers::sync_offers_from_everflow;
