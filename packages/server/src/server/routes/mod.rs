pub mod entities;
pub mod health;
pub mod sync;

pub use entities::{list_advertisers_handler, list_offers_handler};
pub use health::health_handler;
pub use sync::{
    sync_advertisers_handler, sync_history_handler, sync_offers_handler, test_connection_handler,
};
