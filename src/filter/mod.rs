pub mod classifier;
pub mod extractor;
pub mod navigator;
pub mod watcher;

pub use classifier::{run_pass, PassSummary};
pub use extractor::extract;
pub use navigator::advance;
pub use watcher::{observe, ChangeWatcher};
