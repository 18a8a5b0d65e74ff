pub mod facts;
pub mod settings;

pub use facts::{Affordances, CardFacts, DismissHook, Visibility};
pub use settings::{FilterMode, PersistedConfig, Toggle};
