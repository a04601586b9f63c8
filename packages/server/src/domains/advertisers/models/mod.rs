pub mod advertiser;

pub use advertiser::*;
