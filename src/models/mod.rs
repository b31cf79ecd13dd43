pub mod cache_entry;
pub mod ids;
pub mod kind;
pub mod payload;
pub mod pending_write;
pub mod stats;
pub mod sync_status;

pub use cache_entry::CacheEntry;
pub use ids::{LocalId, RemoteId};
pub use kind::EntityKind;
pub use payload::{EventDraft, EventType, Payload, SpotDraft, SpotType};
pub use pending_write::{PendingWrite, QueuedWrite};
pub use stats::{KindStats, StorageStats};
pub use sync_status::SyncStatus;
