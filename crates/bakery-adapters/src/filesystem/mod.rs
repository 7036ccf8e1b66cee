//! Filesystem adapters: the real disk and an in-memory double for tests
//! and tests.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
