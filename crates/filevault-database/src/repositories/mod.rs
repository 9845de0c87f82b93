//! Metadata store for file records.

pub mod file;
pub mod memory;
pub mod store;

pub use file::PgFileRepository;
pub use memory::MemoryFileRepository;
pub use store::FileRecordStore;
