pub mod api;
pub mod errors;
pub mod indicator;
pub mod memory;
pub mod tabs;

pub use api::{KeyChange, KeyValueStore, WriteBatch, WriteOp};
pub use errors::StoreError;
pub use indicator::{IndicatorPort, NoopIndicator, RecordingIndicator, TracingIndicator};
pub use memory::MemoryStore;
pub use tabs::{TabStateEvent, TabStateStore};
