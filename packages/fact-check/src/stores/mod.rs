//! Storage implementations for history and settings.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage
//! - `JsonFileStore` - JSON files in a directory

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
