pub mod auto;
pub mod local_storage;
pub mod memory;

pub use auto::auto_detect_storage;
pub use local_storage::LocalStorage;
pub use memory::MemoryStorage;
