//! Cross-round memory for the dialogue service.
//!
//! - `record`: the derived document and its update rules
//! - `sanitize`: string cleaning applied on load and save
//! - `store`: JSON persistence with lenient load and atomic save

pub mod record;
pub mod sanitize;
pub mod store;

pub use record::{Facts, MemoryRecord, MemorySnapshot, DEFAULT_QUIETNESS};
pub use sanitize::{clean_str, sanitize_value};
pub use store::MemoryStore;
