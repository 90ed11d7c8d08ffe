pub mod memory;
pub mod snapshot;

pub use burrow_core::{ReadRepository, Repository, StorageError};
pub use memory::InMemoryRepository;
