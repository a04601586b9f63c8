// Infrastructure layer: dependency container and external-service traits

pub mod deps;
pub mod everflow_client;
pub mod traits;

pub use deps::ServerDeps;
pub use everflow_client::EverflowAdapter;
pub use traits::BaseEverflowService;
