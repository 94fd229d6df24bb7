// Adapters layer: concrete implementations of the domain ports.

mod convert;
pub mod ecs;
pub mod storage;

pub use ecs::EcsClusterClient;
pub use storage::LocalStorage;
