//! HTML fragment interpolation and caching.

mod cache;
mod store;
mod supplant;

pub use cache::TemplateCache;
pub use store::{FileStore, MemoryStore, StoreError, TemplateStore};
pub use supplant::supplant;
