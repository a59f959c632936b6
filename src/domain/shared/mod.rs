pub mod fallback;
pub mod selection_cache;

pub use fallback::{with_fallback, FallbackError, FallbackOutcome};
pub use selection_cache::SelectionCache;
