pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, SnapshotConfig};
pub use loader::load_config;
