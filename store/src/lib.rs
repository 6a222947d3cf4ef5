pub mod cache;
pub mod document;

mod file_cache;
pub use file_cache::FileCache;

mod memory;
pub use memory::MemoryCache;

pub use cache::LocalCache;
pub use document::{AppData, Card, Priority, Todo, WeatherConfig, WidgetKind};
