pub mod types;
pub mod history_store;
pub mod memory_store;
pub mod file_store;

pub use types::*;
pub use history_store::*;
pub use memory_store::*;
pub use file_store::*;
