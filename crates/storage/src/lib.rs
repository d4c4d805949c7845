pub mod fs_store;
pub mod memory_store;
pub mod store;

pub use fs_store::FsObjectStore;
pub use memory_store::MemoryObjectStore;
pub use store::{ObjectMeta, ObjectStore, StoreError};
