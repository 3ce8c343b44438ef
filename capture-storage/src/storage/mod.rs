//! Storage reader session implementation

mod reader;

pub use reader::StorageReader;
