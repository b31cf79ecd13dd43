pub mod cache;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod settings;
pub mod stats;
pub mod store;

pub use store::OfflineStore;
